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

use actix_web::http::StatusCode;
use cloneable_errors::{ErrContext, ResContext};
use log::info;
use reqwest::{Client, Url};
use tikfetch_api::{format::RenderNumber, Author, Stats, VideoMetadata};

use crate::{constants::*, errors::{Error, Result}, provider::{self, pv}};

/// Turns source links into [`VideoMetadata`]
pub struct Resolver {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl Resolver {
    pub fn new(client: Client, endpoint: Url, timeout: Duration) -> Resolver {
        Resolver { client, endpoint, timeout }
    }

    pub async fn resolve(&self, source_url: Option<&str>) -> Result<VideoMetadata> {
        let source_url = validate_source_url(source_url)?;

        let envelope = provider::fetch_video(&self.client, &self.endpoint, source_url, self.timeout).await
            .map_err(|err| Error::upstream(err.context(format!("Failed to fetch info for {source_url}")), INFO_FAILED))?;

        let pv::Envelope { code, msg, data } = envelope;
        let data = data.filter(|_| code == Some(0))
            .with_context(|| format!("Provider rejected {source_url} - code: {code:?}, msg: {msg:?}"))
            .map_err(|err| Error::upstream(err, PROVIDER_FAILED).set_status(StatusCode::BAD_REQUEST))?;

        let video = normalize(data);
        info!(
            "Resolved video {} by @{} ({} plays)",
            video.id.as_deref().unwrap_or("<no id>"),
            video.author.username,
            video.stats.plays.abbreviate_int(),
        );
        Ok(video)
    }
}

pub fn validate_source_url(url: Option<&str>) -> Result<&str> {
    let Some(url) = url.filter(|url| !url.is_empty()) else {
        return Err(Error::bad_request(MISSING_SOURCE_URL));
    };
    if !SOURCE_URL_REGEX.is_match(url) {
        return Err(Error::bad_request(INVALID_SOURCE_URL));
    }
    Ok(url)
}

// the provider likes to send "" instead of leaving fields out
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Apply every fallback chain to a provider payload
pub fn normalize(video: pv::VideoData) -> VideoMetadata {
    let author = video.author.unwrap_or_default();
    let nickname = non_empty(author.nickname);
    let unique_id = non_empty(author.unique_id);

    let play = non_empty(video.play);
    let hdplay = non_empty(video.hdplay);
    let is_high_definition = hdplay.is_some();

    VideoMetadata {
        id: video.id.map(|id| id.to_string()).filter(|id| !id.is_empty()),
        title: non_empty(video.title).unwrap_or_else(|| FALLBACK_TITLE.to_owned()),
        author: Author {
            name: nickname.or_else(|| unique_id.clone()).unwrap_or_else(|| FALLBACK_AUTHOR_NAME.to_owned()),
            username: unique_id.unwrap_or_default(),
            avatar_url: non_empty(author.avatar).unwrap_or_default(),
        },
        stats: Stats {
            plays: video.play_count.unwrap_or(0),
            likes: video.digg_count.unwrap_or(0),
            comments: video.comment_count.unwrap_or(0),
            shares: video.share_count.unwrap_or(0),
        },
        duration: video.duration.unwrap_or(0),
        thumbnail_url: non_empty(video.cover).or_else(|| non_empty(video.origin_cover)).unwrap_or_default(),
        music_url: non_empty(video.music).unwrap_or_default(),
        music_title: video.music_info.and_then(|info| non_empty(info.title)).unwrap_or_default(),
        hd_url: hdplay.or_else(|| play.clone()),
        sd_url: play.or_else(|| non_empty(video.wmplay)),
        is_high_definition,
    }
}
