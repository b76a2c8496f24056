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
#![allow(clippy::needless_pass_by_value)]
use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::DateTime;
use tikfetch_api::{DownloadParams, InfoRequest, InfoResponse, StatusResponse};

use crate::{built_info, errors::{self, json_error_handler, query_error_handler}, proxy::Proxy, resolver::Resolver, state::AppConfig};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
       .app_data(web::QueryConfig::default().error_handler(query_error_handler))
       .service(helo)
       .service(get_status)
       .service(post_info)
       .service(get_download);
}

type JsonResult<T> = errors::Result<web::Json<T>>;

#[get("")]
async fn helo() -> impl Responder {
    "hi"
}

#[get("/status")]
async fn get_status(config: web::Data<AppConfig>) -> web::Json<StatusResponse> {
    web::Json(StatusResponse {
        server_version: Some(built_info::PKG_VERSION.into()),
        server_git_hash: built_info::GIT_COMMIT_HASH.map(std::convert::Into::into),
        server_git_dirty: built_info::GIT_DIRTY,
        server_build_timestamp: DateTime::parse_from_rfc2822(built_info::BUILT_TIME_UTC).ok().map(|t| t.timestamp()),
        server_startup_timestamp: Some(config.startup_timestamp.timestamp()),
    })
}

#[post("/info")]
async fn post_info(resolver: web::Data<Resolver>, body: web::Json<InfoRequest>) -> JsonResult<InfoResponse> {
    let video = resolver.resolve(body.url.as_deref()).await?;
    Ok(web::Json(video.into()))
}

#[get("/download")]
async fn get_download(proxy: web::Data<Proxy>, query: web::Query<DownloadParams>) -> errors::Result<HttpResponse> {
    proxy.download(query.into_inner()).await
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use actix_web::{body::MessageBody, dev::ServiceResponse, http::{header, StatusCode}, middleware::NormalizePath, test, App};
    use reqwest::Url;
    use serde_json::{json, Value};

    use super::*;
    use crate::{constants::*, state::build_client, test_utils::spawn_server};

    async fn mock_provider(query: web::Query<HashMap<String, String>>) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "code": 0,
            "msg": "success",
            "data": {
                "id": "7301",
                "title": query.get("url").cloned().unwrap_or_default(),
                "author": { "nickname": "Cat Person", "unique_id": "catperson" },
                "play_count": 1_500_000,
                "play": "https://cdn.example/sd.mp4",
                "hdplay": "https://cdn.example/hd.mp4",
            },
        }))
    }

    async fn mock_origin() -> HttpResponse {
        HttpResponse::Ok().content_type("video/mp4").body("not really a video")
    }

    fn mock_upstream() -> Url {
        spawn_server(|cfg| {
            cfg.route("/api/", web::post().to(mock_provider))
               .route("/video.mp4", web::get().to(mock_origin));
        })
    }

    macro_rules! init_app {
        ($upstream:expr) => {{
            let client = build_client().unwrap();
            let resolver = Resolver::new(client.clone(), $upstream.join("/api/").unwrap(), Duration::from_secs(5));
            let proxy = Proxy::new(client, MEDIA_REFERER.clone(), Duration::from_secs(5));
            test::init_service(
                App::new()
                    .wrap(NormalizePath::trim())
                    .app_data(web::Data::new(AppConfig::default()))
                    .app_data(web::Data::new(resolver))
                    .app_data(web::Data::new(proxy))
                    .service(web::scope("/api").configure(configure))
            ).await
        }};
    }

    async fn error_of(resp: ServiceResponse<impl MessageBody>) -> String {
        let body: Value = test::read_body_json(resp).await;
        body["error"].as_str().unwrap().to_owned()
    }

    #[actix_web::test]
    async fn info_returns_normalized_metadata() {
        let upstream = mock_upstream();
        let app = init_app!(upstream);
        let req = test::TestRequest::post().uri("/api/info")
            .set_json(json!({ "url": "https://www.tiktok.com/@catperson/video/7301" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["title"], json!("https://www.tiktok.com/@catperson/video/7301"));
        assert_eq!(body["data"]["author"]["name"], json!("Cat Person"));
        assert_eq!(body["data"]["stats"]["plays"], json!(1_500_000));
        assert_eq!(body["data"]["hdUrl"], json!("https://cdn.example/hd.mp4"));
        assert_eq!(body["data"]["isHighDefinition"], json!(true));
    }

    #[actix_web::test]
    async fn info_rejects_bad_input() {
        let upstream = mock_upstream();
        let app = init_app!(upstream);

        let req = test::TestRequest::post().uri("/api/info").set_json(json!({})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(resp).await, MISSING_SOURCE_URL);

        let req = test::TestRequest::post().uri("/api/info").set_json(json!({ "url": "https://example.com/v/1" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(resp).await, INVALID_SOURCE_URL);

        let req = test::TestRequest::post().uri("/api/info")
            .insert_header(header::ContentType::json())
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(resp).await, MALFORMED_REQUEST);
    }

    #[actix_web::test]
    async fn download_streams_attachment() {
        let upstream = mock_upstream();
        let app = init_app!(upstream);
        let mut target = upstream.join("/api/download").unwrap();
        target.query_pairs_mut()
            .append_pair("url", upstream.join("/video.mp4").unwrap().as_str())
            .append_pair("filename", "cat video");
        let req = test::TestRequest::get()
            .uri(&format!("{}?{}", target.path(), target.query().unwrap_or_default()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_DISPOSITION).unwrap(), "attachment; filename=\"cat_video.mp4\"");
        assert_eq!(test::read_body(resp).await, "not really a video");
    }

    #[actix_web::test]
    async fn download_rejects_bad_input() {
        let upstream = mock_upstream();
        let app = init_app!(upstream);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/download").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(resp).await, MISSING_MEDIA_URL);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/download?url=ftp%3A%2F%2Fexample.com%2Fv.mp4").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(resp).await, INVALID_MEDIA_URL);
    }

    #[actix_web::test]
    async fn status_and_liveness() {
        let upstream = mock_upstream();
        let app = init_app!(upstream);

        let status: StatusResponse = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status").to_request()).await;
        assert_eq!(status.server_version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
        assert!(status.server_startup_timestamp.is_some());

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/api/").to_request()).await;
        assert_eq!(body, "hi");
    }
}
