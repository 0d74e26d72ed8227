// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admin socket wire format (§6): a 4-byte big-endian length prefix
//! followed by a JSON payload, mirroring the length-prefixed framing used
//! elsewhere in this codebase. `Request`/`Response` map 1:1 onto the public
//! operations `vimap_engine::Server` exposes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use vimap_core::{RobotId, SensorId, Vec3};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload of {0} bytes exceeds the {1} byte limit")]
    PayloadTooLarge(usize, usize),
}

/// Cap a single frame well above any realistic submap path or status
/// snapshot, while still rejecting a corrupt or hostile length prefix.
const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    SubmitSubmap { robot_name: String, path: String },
    DeleteMission { partial_id: String },
    DeleteAllRobotMissions { robot_name: String },
    Lookup { robot_name: String, sensor_type: String, timestamp_ns: i64, p_s: [f64; 3] },
    Status,
    SaveMap { path: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum Response {
    Enqueued,
    DuplicateRejected,
    MissionDeleted { mission_id: String },
    RobotMissionsDeleted { count: usize },
    LookupResult { status: String, p_g: Option<[f64; 3]>, sensor_origin_g: Option<[f64; 3]> },
    Status { snapshot: String },
    Saved,
    Error { message: String },
}

impl Request {
    pub fn robot_id(robot_name: &str) -> RobotId {
        RobotId::new(robot_name)
    }

    pub fn sensor_id(sensor_type: &str) -> SensorId {
        SensorId::new(sensor_type)
    }

    pub fn point(p_s: [f64; 3]) -> Vec3 {
        Vec3::new(p_s[0], p_s[1], p_s[2])
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(ProtocolError::PayloadTooLarge(payload.len(), MAX_PAYLOAD_BYTES));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_PAYLOAD_BYTES {
        return Err(ProtocolError::PayloadTooLarge(len, MAX_PAYLOAD_BYTES));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

pub async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Request, ProtocolError> {
    decode(&read_message(reader).await?)
}

pub async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<(), ProtocolError> {
    write_message(writer, &encode(response)?).await
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
