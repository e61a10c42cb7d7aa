//! Maps wire requests onto the player API.

use tracing::debug;
use vp_protocol::{ApiRequest, ApiResponse};
use vp_runtime::VideoPlayerApi;

/// Code reported for request lines that do not parse.
pub const MALFORMED_REQUEST: &str = "malformed_request";

/// Runs one request. API failures become [`ApiResponse::Error`].
pub async fn dispatch(api: &dyn VideoPlayerApi, request: ApiRequest) -> ApiResponse {
	let result = match request {
		ApiRequest::Initialize => api.initialize().await.map(|()| ApiResponse::Ok),
		ApiRequest::CreateForPlatformView { options } => api
			.create_for_platform_view(options)
			.await
			.map(|player_id| ApiResponse::Player { player_id }),
		ApiRequest::CreateForTextureView { options } => api.create_for_texture_view(options).await.map(ApiResponse::from),
		ApiRequest::Dispose { player_id } => api.dispose(player_id).await.map(|()| ApiResponse::Ok),
		ApiRequest::SetMixWithOthers { mix_with_others } => api.set_mix_with_others(mix_with_others).await.map(|()| ApiResponse::Ok),
		ApiRequest::LookupAssetKey { asset, package_name } => api
			.lookup_key_for_asset(&asset, package_name.as_deref())
			.await
			.map(|key| ApiResponse::AssetKey { key }),
	};

	result.unwrap_or_else(|err| {
		debug!(target = "vp.dispatch", code = err.code(), error = %err, "request failed");
		ApiResponse::from(err)
	})
}

/// Parses and runs one request line.
pub async fn dispatch_line(api: &dyn VideoPlayerApi, line: &str) -> ApiResponse {
	match serde_json::from_str::<ApiRequest>(line) {
		Ok(request) => dispatch(api, request).await,
		Err(err) => ApiResponse::Error {
			code: MALFORMED_REQUEST.to_string(),
			message: err.to_string(),
		},
	}
}
