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
use std::time::Duration;

use actix_web::{body::SizedStream, http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType}, rt::time::timeout, HttpResponse};
use cloneable_errors::{ErrorContext, ResContext};
use futures::TryStreamExt;
use log::warn;
use reqwest::{header::REFERER, Client, Response, Url};
use tikfetch_api::DownloadParams;

use crate::{constants::*, errors::{Error, Result}};

/// Re-streams media files from their origin to the client
pub struct Proxy {
    client: Client,
    referer: Url,
    header_timeout: Duration,
}

impl Proxy {
    pub fn new(client: Client, referer: Url, header_timeout: Duration) -> Proxy {
        Proxy { client, referer, header_timeout }
    }

    /// Send the upstream request and wait for its headers.
    ///
    /// The timeout only covers the headers, the body may take as long as the client needs.
    async fn open(&self, url: Url) -> std::result::Result<Response, ErrorContext> {
        let req = self.client.get(url)
            .header(REFERER, self.referer.as_str());
        let resp = timeout(self.header_timeout, req.send()).await
            .context("Timed out waiting for the media origin")?
            .context("Failed to send media request")?;
        resp.error_for_status().context("Media request failed")
    }

    pub async fn download(&self, params: DownloadParams) -> Result<HttpResponse> {
        let url = parse_media_url(params.url.as_deref())?;
        let filename = sanitize_filename(params.filename.as_deref());

        let resp = self.open(url).await
            .map_err(|err| Error::upstream(err, DOWNLOAD_FAILED))?;
        let content_length = resp.content_length();

        // the body is only polled when the client can take more data, and dropping
        // it (client went away) drops the upstream connection too
        let body = resp.bytes_stream()
            .inspect_err(|err| warn!("Media stream failed mid-transfer, dropping the connection: {err}"));

        let mut builder = HttpResponse::Ok();
        builder.insert_header(ContentType::octet_stream())
               .insert_header(ContentDisposition {
                   disposition: DispositionType::Attachment,
                   parameters: vec![DispositionParam::Filename(format!("{filename}.mp4"))],
               });
        Ok(match content_length {
            Some(len) => builder.body(SizedStream::new(len, body)),
            None => builder.streaming(body),
        })
    }
}

pub fn parse_media_url(url: Option<&str>) -> Result<Url> {
    let Some(url) = url.filter(|url| !url.is_empty()) else {
        return Err(Error::bad_request(MISSING_MEDIA_URL));
    };
    match Url::parse(url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(Error::bad_request(INVALID_MEDIA_URL)),
    }
}

/// Replace everything outside of `[A-Za-z0-9_-]` with `_`,
/// so the name is safe to put in a quoted header parameter
pub fn sanitize_filename(filename: Option<&str>) -> String {
    match filename {
        None | Some("") => FALLBACK_FILENAME.to_owned(),
        Some(name) => name.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect(),
    }
}
