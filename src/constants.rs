pub(crate) const PARAM_MARKER: char = ':';

pub(crate) const NOT_FOUND_BODY: &str = "404 page not found\n";
pub(crate) const METHOD_NOT_ALLOWED_BODY: &str = "405 method not allowed\n";
pub(crate) const INTERNAL_SERVER_ERROR_BODY: &str = "Internal Server Error";

pub(crate) const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub(crate) const APPLICATION_JSON: &str = "application/json";
