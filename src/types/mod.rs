pub use self::params::Params;
pub(crate) use self::request_meta::RequestMeta;

mod params;
mod request_meta;
