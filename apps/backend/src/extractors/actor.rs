//! Caller identity forwarded by the upstream gateway.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Optional actor id from the `x-actor-id` header.
///
/// The gateway has already authorized the caller; this only records who
/// asked. An absent or blank header yields `ActorId(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorId(pub Option<i64>);

impl ActorId {
    pub fn into_inner(self) -> Option<i64> {
        self.0
    }
}

fn parse_actor(req: &HttpRequest) -> Result<ActorId, AppError> {
    let Some(raw) = req.headers().get(ACTOR_HEADER) else {
        return Ok(ActorId(None));
    };
    let raw = raw.to_str().map_err(|_| {
        AppError::invalid(ErrorCode::InvalidActorId, "Actor id header is not valid text")
    })?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(ActorId(None));
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(ActorId(Some(id))),
        _ => Err(AppError::invalid(
            ErrorCode::InvalidActorId,
            format!("Actor id must be a positive integer, got '{raw}'"),
        )),
    }
}

impl FromRequest for ActorId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_actor(req))
    }
}
