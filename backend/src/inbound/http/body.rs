//! JSON body extractor that reads an absent body as the default value.
//!
//! Clients of the workflow endpoints may omit the body entirely; that must
//! reach validation as `{}` rather than fail as a content-type error.

use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::domain::Error;

/// Deserialised request body, or `T::default()` when the body is blank.
#[derive(Debug)]
pub struct JsonOrEmpty<T>(pub T);

impl<T> JsonOrEmpty<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for JsonOrEmpty<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

fn parse<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|err| Error::invalid_request(format!("Invalid JSON body: {err}")))
}

impl<T> FromRequest for JsonOrEmpty<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = body
                .await
                .map_err(|err| Error::invalid_request(format!("Invalid request body: {err}")))?;
            Ok(Self(parse(&bytes)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, MeetingRequest};
    use rstest::rstest;

    #[rstest]
    #[case(b"")]
    #[case(b"  \n")]
    fn blank_body_is_default(#[case] bytes: &[u8]) {
        let request: MeetingRequest = parse(bytes).expect("blank body");
        assert_eq!(request, MeetingRequest::default());
    }

    #[rstest]
    fn present_body_is_parsed() {
        let request: MeetingRequest =
            parse(br#"{"meetingDate":"2024-05-01","meetingTime":"14:30"}"#).expect("valid body");
        assert_eq!(request.meeting_time.as_deref(), Some("14:30"));
    }

    #[rstest]
    fn malformed_body_is_invalid_request() {
        let err = parse::<MeetingRequest>(b"{not json").expect_err("malformed");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().starts_with("Invalid JSON body"));
    }
}
