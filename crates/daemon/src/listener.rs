// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The admin socket (§6): a Unix listener accepting one request per
//! connection and dispatching it 1:1 onto a public `Server` operation.
//! Socket framing is a thin, separately-tested shell; the scenario-level
//! coverage lives against the `Server` API directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};
use vimap_core::{Clock, MapError};
use vimap_engine::Server;

use crate::protocol::{read_request, write_response, ProtocolError, Request, Response};

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

pub struct Listener<C: Clock + 'static> {
    unix: UnixListener,
    server: Arc<Server<C>>,
}

impl<C: Clock + 'static> Listener<C> {
    /// Bind the admin socket at `path`, removing a stale socket file left
    /// behind by a previous run first.
    pub fn bind(path: &Path, server: Arc<Server<C>>) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let _ = std::fs::remove_file(path);
        let unix = UnixListener::bind(path)?;
        Ok(Self { unix, server })
    }

    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let server = Arc::clone(&self.server);
                    tokio::spawn(async move {
                        if let Err(err) = handle_connection(stream, &server).await {
                            log_connection_error(err);
                        }
                    });
                }
                Err(err) => error!(%err, "admin socket accept error"),
            }
        }
    }
}

fn log_connection_error(err: ConnectionError) {
    match &err {
        ConnectionError::Protocol(ProtocolError::Io(io_err))
            if io_err.kind() == std::io::ErrorKind::UnexpectedEof =>
        {
            debug!("admin socket client disconnected");
        }
        _ => warn!(%err, "admin socket connection error"),
    }
}

async fn handle_connection<C: Clock + 'static>(mut stream: UnixStream, server: &Server<C>) -> Result<(), ConnectionError> {
    let request = read_request(&mut stream).await?;
    info!(?request, "admin socket request");
    let response = handle_request(request, server);
    write_response(&mut stream, &response).await?;
    Ok(())
}

fn handle_request<C: Clock + 'static>(request: Request, server: &Server<C>) -> Response {
    match request {
        Request::SubmitSubmap { robot_name, path } => {
            match server.load_and_process_submap(Request::robot_id(&robot_name), PathBuf::from(path)) {
                Ok(vimap_engine::AdmissionOutcome::Enqueued) => Response::Enqueued,
                Ok(vimap_engine::AdmissionOutcome::DuplicateRejected) => Response::DuplicateRejected,
                Err(err) => error_response(&err),
            }
        }

        Request::DeleteMission { partial_id } => match server.delete_mission(&partial_id) {
            Ok(mission_id) => Response::MissionDeleted { mission_id: mission_id.to_string() },
            Err(err) => error_response(&err),
        },

        Request::DeleteAllRobotMissions { robot_name } => {
            let count = server.delete_all_robot_missions(&Request::robot_id(&robot_name));
            Response::RobotMissionsDeleted { count }
        }

        Request::Lookup { robot_name, sensor_type, timestamp_ns, p_s } => {
            let result = server.map_lookup(&Request::robot_id(&robot_name), &Request::sensor_id(&sensor_type), timestamp_ns, Request::point(p_s));
            Response::LookupResult {
                status: result.status.to_string(),
                p_g: result.p_g.map(|v| [v.x, v.y, v.z]),
                sensor_origin_g: result.sensor_origin_g.map(|v| [v.x, v.y, v.z]),
            }
        }

        Request::Status => Response::Status { snapshot: server.status_snapshot() },

        Request::SaveMap { path } => match server.save_map(Path::new(&path)) {
            Ok(()) => Response::Saved,
            Err(err) => error_response(&err),
        },
    }
}

fn error_response(err: &MapError) -> Response {
    Response::Error { message: err.to_string() }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
