use crate::constants;
use crate::Error;
use bytes::Bytes;
use http_body_util::Full;
use http::header::{self, HeaderValue};
use http::{Response, StatusCode};
use percent_encoding::percent_decode_str;

pub(crate) fn percent_decode_request_path(val: &str) -> Result<String, Error> {
    percent_decode_str(val)
        .decode_utf8()
        .map(|val| val.to_string())
        .map_err(|source| Error::InvalidRequestPath {
            path: val.to_owned(),
            source,
        })
}

/// Splits a path on `/` after trimming leading and trailing slashes. Empty segments
/// produced by doubled slashes are kept, so `/a//b` never matches `/a/b`.
pub(crate) fn path_segments(path: &str) -> Option<std::str::Split<'_, char>> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.split('/'))
    }
}

pub(crate) fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(body.into()));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(constants::TEXT_PLAIN_UTF8));
    res.headers_mut()
        .insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    res
}

pub(crate) fn query_value(query: Option<&str>, key: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
