#![warn(clippy::pedantic)]

pub mod gemini;
pub mod http;
pub mod rest;

pub use gemini::Gemini;
pub use http::{HttpRequest, HttpResponse, Method, ReqwestSendRequest, SendError, SendRequest};
pub use rest::Rest;
