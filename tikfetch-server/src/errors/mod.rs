/* This file is part of the TikFetch project
*
*  Copyright (C) 2026 TikFetch contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::fmt::{Debug, Display};
use actix_web::{error::{JsonPayloadError, QueryPayloadError}, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use cloneable_errors::ErrorContext;
use log::{debug, error, warn};
use tikfetch_api::ErrorResponse;

use crate::constants::MALFORMED_REQUEST;

/// Every error a handler can return.
///
/// Only the `&'static str` message ever reaches the client. The cause of an
/// [`Error::Upstream`] is logged when the response is built.
pub enum Error {
    /// Rejected before any upstream request was made
    Rejected(StatusCode, &'static str),
    /// Something went wrong while talking to the provider or the media origin
    Upstream {
        cause: ErrorContext,
        status: StatusCode,
        message: &'static str,
    },
}

impl Error {
    pub fn bad_request(message: &'static str) -> Self {
        Error::Rejected(StatusCode::BAD_REQUEST, message)
    }

    pub fn upstream(cause: ErrorContext, message: &'static str) -> Self {
        Error::Upstream { cause, status: StatusCode::INTERNAL_SERVER_ERROR, message }
    }

    pub fn set_status(self, status: StatusCode) -> Self {
        match self {
            Error::Rejected(_, message) => Error::Rejected(status, message),
            Error::Upstream { cause, message, .. } => Error::Upstream { cause, status, message },
        }
    }

    pub fn message(&self) -> &'static str {
        let (Error::Rejected(_, message) | Error::Upstream { message, .. }) = self;
        *message
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Rejected(status, message) => f.debug_tuple("Error::Rejected").field(status).field(message).finish(),
            Error::Upstream { cause, status, message } => f.debug_struct("Error::Upstream")
                .field("cause", cause)
                .field("status", status)
                .field("message", message)
                .finish(),
        }
    }
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Rejected(_, message) => write!(f, "{message}"),
            Error::Upstream { cause, message, .. } => write!(f, "{message} ({cause})"),
        }
    }
}
impl std::error::Error for Error {}
impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        let (Error::Rejected(status, _) | Error::Upstream { status, .. }) = self;
        *status
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if let Error::Upstream { cause, message, .. } = self {
            if status.is_server_error() {
                error!("{message}\n{cause:?}");
            } else {
                warn!("{message}\n{cause:?}");
            }
        }
        HttpResponse::build(status).json(ErrorResponse { error: self.message().to_owned() })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// extractor failures get the same `{ error }` shape as everything else
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected a malformed JSON body: {err}");
    Error::bad_request(MALFORMED_REQUEST).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected a malformed query string: {err}");
    Error::bad_request(MALFORMED_REQUEST).into()
}
