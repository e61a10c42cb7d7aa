//! Request/response envelope used by hosts to drive the player API.

use serde::{Deserialize, Serialize};

use crate::options::CreationOptions;
use crate::types::{PlayerId, TexturePlayerIds};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiRequest {
	Initialize,
	CreateForPlatformView {
		options: CreationOptions,
	},
	CreateForTextureView {
		options: CreationOptions,
	},
	Dispose {
		player_id: PlayerId,
	},
	SetMixWithOthers {
		mix_with_others: bool,
	},
	LookupAssetKey {
		asset: String,
		#[serde(default)]
		package_name: Option<String>,
	},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiResponse {
	Ok,
	Player { player_id: PlayerId },
	TexturePlayer { player_id: PlayerId, texture_id: i64 },
	AssetKey { key: String },
	Error { code: String, message: String },
}

impl From<TexturePlayerIds> for ApiResponse {
	fn from(ids: TexturePlayerIds) -> Self {
		Self::TexturePlayer {
			player_id: ids.player_id,
			texture_id: ids.texture_id,
		}
	}
}
