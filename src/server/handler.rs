use std::path::Path;
use std::time::SystemTime;

use crate::http::mime::mime_type_for;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::server::resolver::resolve;

/// Builds the 200 or 404 for a validated request.
pub async fn handle_request(request: Request, doc_root: &Path) -> Response {
    match resolve(doc_root, &request.target).await {
        Ok(file) => ResponseBuilder::new(StatusCode::Ok)
            .date(SystemTime::now())
            .header("Content-Type", mime_type_for(&file.path))
            .header("Last-Modified", httpdate::fmt_http_date(file.modified))
            .request(request)
            .file(file.path, file.len)
            .build(),
        Err(reason) => {
            tracing::debug!(path = %request.target, %reason, "Target not found");
            Response::not_found(request)
        }
    }
}
