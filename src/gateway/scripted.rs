use super::{Gateway, GatewayFailure, GatewayRequest};
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::sync::{Mutex, PoisonError};

enum ScriptedReply {
    Ready(Result<String, GatewayFailure>),
    Held {
        release: Receiver<()>,
        reply: Result<String, GatewayFailure>,
    },
}

/// In-process gateway that replays queued replies in order and records every request.
///
/// Stands in for the native backend in tests and offline demos. A held reply blocks
/// the calling thread until its release channel fires or is dropped.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, payload: impl Into<String>) -> &Self {
        self.push(ScriptedReply::Ready(Ok(payload.into())))
    }

    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        self.push(ScriptedReply::Ready(Err(GatewayFailure::Text(message.into()))))
    }

    pub fn push_unexpected(&self, message: impl Into<String>) -> &Self {
        self.push(ScriptedReply::Ready(Err(GatewayFailure::Unexpected(
            message.into(),
        ))))
    }

    pub fn push_held(
        &self,
        release: Receiver<()>,
        reply: Result<String, GatewayFailure>,
    ) -> &Self {
        self.push(ScriptedReply::Held { release, reply })
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.command() == command)
            .count()
    }

    pub fn pending_replies(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, reply: ScriptedReply) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }
}

impl Gateway for ScriptedGateway {
    fn invoke(&self, request: &GatewayRequest) -> Result<String, GatewayFailure> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let next = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match next {
            Some(ScriptedReply::Ready(reply)) => reply,
            Some(ScriptedReply::Held { release, reply }) => {
                let _ = release.recv();
                reply
            }
            None => Err(GatewayFailure::Unexpected(format!(
                "no scripted reply for `{}`",
                request.command()
            ))),
        }
    }
}
