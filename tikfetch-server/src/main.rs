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
use std::{fs::{set_permissions, Permissions}, os::unix::prelude::PermissionsExt, path::Path};
use actix_files::{Files, NamedFile};
use actix_web::{dev::{fn_service, ServiceRequest, ServiceResponse}, middleware::{Logger, NormalizePath}, web, App, HttpServer};
use cloneable_errors::{ErrorContext, ResContext};
use env_logger::Env;
use log::info;

mod constants;
mod errors;
mod provider;
mod proxy;
mod resolver;
mod routes;
mod state;
#[cfg(test)]
mod test_utils;

use constants::*;
use proxy::Proxy;
use resolver::Resolver;
use state::{build_client, AppConfig};

#[actix_web::main]
async fn main() -> Result<(), ErrorContext> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::load(Path::new(CONFIG_PATH))?
        .with_port_override(std::env::var("PORT").ok().as_deref())?;
    let config = web::Data::new(config);

    let client = build_client()?;
    let resolver = web::Data::new(Resolver::new(client.clone(), PROVIDER_URL.clone(), METADATA_TIMEOUT));
    let proxy = web::Data::new(Proxy::new(client, MEDIA_REFERER.clone(), MEDIA_TIMEOUT));

    let mut server = {
        let config = config.clone();
        HttpServer::new(move || {
            let config2 = config.clone();
            App::new()
                .wrap(NormalizePath::trim())
                .wrap(Logger::default())
                .app_data(config.clone())
                .app_data(resolver.clone())
                .app_data(proxy.clone())
                .service(web::scope("/api")
                    .configure(routes::configure)
                )
                .service(
                    Files::new("/", config.static_content_path.as_path())
                        .index_file("index.html")
                        .default_handler(fn_service(move |req: ServiceRequest| {
                            let config = config2.clone();
                            async move {
                                let (req, _) = req.into_parts();
                                let index_file = config.static_content_path.join("index.html");
                                let file = NamedFile::open_async(index_file.as_path()).await?;
                                let resp = file.into_response(&req);
                                Ok(ServiceResponse::new(req, resp))
                            }
                        }))
                )
        })
    };
    if let Some((ref ip, port)) = config.listen.tcp {
        let ip_str = ip.as_str();
        server = server.bind((ip_str, port)).with_context(|| format!("Failed to bind to tcp port {ip_str}:{port}"))?;
        info!("Listening on {ip_str}:{port}");
    }
    if let Some(ref path) = config.listen.unix {
        let path_str = path.as_str();
        server = server.bind_uds(path_str).with_context(|| format!("Failed to bind to unix socket {path_str}"))?;
        if let Some(mode) = config.listen.unix_mode {
            let perms = Permissions::from_mode(mode);
            set_permissions(path_str, perms).with_context(|| format!("Failed to change mode of unix socket {path_str} to {mode}"))?;
        }
        info!("Listening on {path_str}");
    }
    server.run()
    .await
    .context("Error while running the server")
}

mod built_info {
    // Contents generated by buildscript, using built
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
