// Status code table and error types for the property web service
use thiserror::Error;

/// Status code reported by the service for a successfully processed request.
pub const SUCCESS_CODE: i32 = 0;

/// Message used for status codes missing from [`STATUS_MESSAGES`].
pub const UNKNOWN_STATUS: &str = "Unknown status.";

/// Known status codes and their descriptions.
///
/// 0 is success, 1-7 are service level failures and the 500 range reports
/// malformed or unmatched input. 508 is not documented by the service but is
/// returned in place of 502.
pub static STATUS_MESSAGES: &[(i32, &str)] = &[
    (0, "Request successfully processed"),
    (
        1,
        concat!(
            "Service error-there was a server-side error while processing the request. \n ",
            "Check to see if your url is properly formed: delimiters, character cases, etc."
        ),
    ),
    (
        2,
        concat!(
            "The specified ZWSID parameter was invalid or not specified in the request. \n",
            "Check if you have provided a ZWSID in your API call. ",
            "If yes, check if the ZWSID is keyed in correctly. ",
            "If it still doesn't work, contact Zillow to get help on fixing your ZWSID."
        ),
    ),
    (
        3,
        concat!(
            "Web services are currently unavailable.\n",
            "The Zillow Web Service is currently not available. ",
            "Please come back later and try again."
        ),
    ),
    (
        4,
        concat!(
            "The API call is currently unavailable.\n",
            "The Zillow Web Service is currently not available. ",
            "Please come back later and try again."
        ),
    ),
    (6, "This account is not authorized to execute this API call."),
    (7, "Too many requests. \nDaily requests exceeded."),
    (
        500,
        concat!(
            "Invalid or missing address parameter.\n",
            "Check if the input address parameter matches the format specified ",
            "in the input parameters table. When inputting a city name, the ",
            "state should also be given. A city name alone will not give ",
            "a valid address."
        ),
    ),
    (
        501,
        concat!(
            "Invalid or missing citystatezip parameter. ",
            "Check if the input address parameter matches the format specified ",
            "in the input parameters table. When inputting a city name, the ",
            "state should also be given. A city name alone will not give ",
            "a valid address."
        ),
    ),
    (
        502,
        concat!(
            "No results found. \n ",
            "Sorry, the address you provided is not found in the Zillow property database."
        ),
    ),
    (
        503,
        concat!(
            "Failed to resolve city, state or ZIP code.\n ",
            "Check if the city-state combination is valid. ",
            "Also check if you have provided a valid ZIP code."
        ),
    ),
    (
        504,
        concat!(
            "No coverage for specified area. \n",
            "The specified area is not covered by the Zillow property database."
        ),
    ),
    (
        505,
        concat!(
            "Timeout Your request timed out. \n",
            "The server could be busy or unavailable. Try again later."
        ),
    ),
    (
        506,
        "Address string too long. \nIf address is valid, try using abbreviations."
    ),
    (
        507,
        "No exact match found. \nVerify that the given address is correct."
    ),
    (508, "No exact match found for input address."),
];

/// Description for a status code, falling back to [`UNKNOWN_STATUS`].
pub fn status_message(code: i32) -> &'static str {
    STATUS_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(UNKNOWN_STATUS, |&(_, message)| message)
}

// Failures surfaced by a dispatched request
#[derive(Error, Debug)]
pub enum ZillowError {
    /// The call could not be completed: network failure, non-2xx status or
    /// a body that is not a usable XML document.
    #[error("Request failed for ({query}): {reason}")]
    RequestFailed { query: String, reason: String },

    /// The service processed the request and reported a non-zero status.
    #[error("Status {code}: {message}")]
    Api {
        code: i32,
        message: String,
        url: String,
        response: String,
    },

    #[error("No results returned for ({query})")]
    NoResults { query: String },
}

impl ZillowError {
    pub fn request_failed(query: impl Into<String>, reason: impl ToString) -> Self {
        ZillowError::RequestFailed {
            query: query.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an API error, resolving the message from the status table.
    pub fn api(code: i32, url: impl Into<String>, response: impl Into<String>) -> Self {
        ZillowError::Api {
            code,
            message: status_message(code).to_string(),
            url: url.into(),
            response: response.into(),
        }
    }

    pub fn no_results(query: impl Into<String>) -> Self {
        ZillowError::NoResults {
            query: query.into(),
        }
    }

    /// Status code reported by the service, for API errors only.
    pub fn code(&self) -> Option<i32> {
        match self {
            ZillowError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "Request successfully processed")]
    #[test_case(1, "Service error-there was a server-side error")]
    #[test_case(2, "The specified ZWSID parameter was invalid")]
    #[test_case(3, "Web services are currently unavailable.")]
    #[test_case(4, "The API call is currently unavailable.")]
    #[test_case(6, "This account is not authorized to execute this API call.")]
    #[test_case(7, "Too many requests.")]
    #[test_case(500, "Invalid or missing address parameter.")]
    #[test_case(501, "Invalid or missing citystatezip parameter.")]
    #[test_case(502, "No results found.")]
    #[test_case(503, "Failed to resolve city, state or ZIP code.")]
    #[test_case(504, "No coverage for specified area.")]
    #[test_case(505, "Timeout Your request timed out.")]
    #[test_case(506, "Address string too long.")]
    #[test_case(507, "No exact match found.")]
    #[test_case(508, "No exact match found for input address.")]
    fn test_known_status_messages(code: i32, expected_prefix: &str) {
        assert!(
            status_message(code).starts_with(expected_prefix),
            "code {} resolved to {:?}",
            code,
            status_message(code)
        );
    }

    #[test_case(5; "gap in service range")]
    #[test_case(-1; "negative")]
    #[test_case(509; "past input range")]
    #[test_case(9999; "large")]
    fn test_unknown_status_falls_back(code: i32) {
        assert_eq!(status_message(code), UNKNOWN_STATUS);
    }

    #[test]
    fn test_table_has_unique_codes() {
        let mut codes: Vec<i32> = STATUS_MESSAGES.iter().map(|(code, _)| *code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), STATUS_MESSAGES.len());
    }

    #[test]
    fn test_api_error_display_and_fields() {
        let err = ZillowError::api(508, "http://host/api?zws-id=x", "<xml/>");

        assert_eq!(
            err.to_string(),
            "Status 508: No exact match found for input address."
        );
        assert_eq!(err.code(), Some(508));
        match err {
            ZillowError::Api { url, response, .. } => {
                assert_eq!(url, "http://host/api?zws-id=x");
                assert_eq!(response, "<xml/>");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_for_unknown_code() {
        let err = ZillowError::api(42, "", "");
        assert_eq!(err.to_string(), "Status 42: Unknown status.");
    }

    #[test]
    fn test_other_errors_have_no_code() {
        assert_eq!(ZillowError::no_results("somewhere").code(), None);
        assert_eq!(
            ZillowError::request_failed("somewhere", "timed out").code(),
            None
        );
        assert_eq!(
            ZillowError::no_results("2114 Bigelow Ave").to_string(),
            "No results returned for (2114 Bigelow Ave)"
        );
    }
}
