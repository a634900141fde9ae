use async_trait::async_trait;
use tracing::debug;
use validator::ValidateEmail;

use jobboard_errors::JobBoardResult;

use crate::error::ApiError;

/// Category a failed rule resolves to. Each rule carries its category
/// explicitly; the original string-prefix sniffing of failure messages is
/// intentionally not reproduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    BadRequest,
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub kind: ErrorKind,
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub fn bad_request(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::BadRequest,
            field,
            message: message.into(),
        }
    }

    pub fn not_found(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            field,
            message: message.into(),
        }
    }

    pub fn unauthorized(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            field,
            message: message.into(),
        }
    }
}

/// One field-level check against a request context. Rules that need the
/// data store go through the repositories on the context.
#[async_trait]
pub trait FieldRule<C>: Send + Sync {
    async fn check(&self, ctx: &C) -> JobBoardResult<Option<Violation>>;
}

/// Runs every rule in declaration order and turns the collected failures
/// into exactly one error, or passes the request through untouched.
pub struct ValidationGate<C> {
    rules: Vec<Box<dyn FieldRule<C>>>,
}

impl<C: Sync> ValidationGate<C> {
    pub fn new(rules: Vec<Box<dyn FieldRule<C>>>) -> Self {
        Self { rules }
    }

    /// Every rule is awaited before the pass/fail decision, so no failure
    /// is lost to a sibling's outcome. The first violation in declaration
    /// order picks the error category: an unauthorized failure carries
    /// only its own message, the other categories carry the full message
    /// sequence.
    pub async fn run(&self, ctx: &C) -> Result<(), ApiError> {
        let mut violations: Vec<Violation> = Vec::new();
        for rule in &self.rules {
            if let Some(violation) = rule.check(ctx).await? {
                violations.push(violation);
            }
        }

        if violations.is_empty() {
            return Ok(());
        }

        let kind = violations[0].kind;
        debug!(
            ?kind,
            field = violations[0].field,
            failed = violations.len(),
            "request rejected by validation"
        );

        match kind {
            ErrorKind::NotFound => Err(ApiError::NotFound(into_messages(violations))),
            ErrorKind::Unauthorized => {
                let first = violations
                    .into_iter()
                    .next()
                    .map(|violation| violation.message)
                    .unwrap_or_default();
                Err(ApiError::Unauthorized(first))
            }
            ErrorKind::BadRequest => Err(ApiError::BadRequest(into_messages(violations))),
        }
    }
}

fn into_messages(violations: Vec<Violation>) -> Vec<String> {
    violations
        .into_iter()
        .map(|violation| violation.message)
        .collect()
}

/// Fails when the field is empty.
pub struct Required<C> {
    field: &'static str,
    get: fn(&C) -> &str,
    message: &'static str,
}

impl<C> Required<C> {
    pub fn new(field: &'static str, get: fn(&C) -> &str, message: &'static str) -> Self {
        Self {
            field,
            get,
            message,
        }
    }
}

#[async_trait]
impl<C: Sync> FieldRule<C> for Required<C> {
    async fn check(&self, ctx: &C) -> JobBoardResult<Option<Violation>> {
        if (self.get)(ctx).is_empty() {
            Ok(Some(Violation::bad_request(self.field, self.message)))
        } else {
            Ok(None)
        }
    }
}

/// Fails when the field is not a well-formed email address. An empty
/// value fails too, matching the required/format rule pairing.
pub struct Email<C> {
    field: &'static str,
    get: fn(&C) -> &str,
    message: &'static str,
}

impl<C> Email<C> {
    pub fn new(field: &'static str, get: fn(&C) -> &str, message: &'static str) -> Self {
        Self {
            field,
            get,
            message,
        }
    }
}

#[async_trait]
impl<C: Sync> FieldRule<C> for Email<C> {
    async fn check(&self, ctx: &C) -> JobBoardResult<Option<Violation>> {
        if !(self.get)(ctx).validate_email() {
            Ok(Some(Violation::bad_request(self.field, self.message)))
        } else {
            Ok(None)
        }
    }
}

/// Fails when the field is shorter than `min` characters.
pub struct MinLength<C> {
    field: &'static str,
    get: fn(&C) -> &str,
    min: usize,
    message: &'static str,
}

impl<C> MinLength<C> {
    pub fn new(
        field: &'static str,
        get: fn(&C) -> &str,
        min: usize,
        message: &'static str,
    ) -> Self {
        Self {
            field,
            get,
            min,
            message,
        }
    }
}

#[async_trait]
impl<C: Sync> FieldRule<C> for MinLength<C> {
    async fn check(&self, ctx: &C) -> JobBoardResult<Option<Violation>> {
        if (self.get)(ctx).chars().count() < self.min {
            Ok(Some(Violation::bad_request(self.field, self.message)))
        } else {
            Ok(None)
        }
    }
}

/// Fails unless the field value is accepted by the membership predicate.
pub struct OneOf<C> {
    field: &'static str,
    get: fn(&C) -> &str,
    accepts: fn(&str) -> bool,
    message: &'static str,
}

impl<C> OneOf<C> {
    pub fn new(
        field: &'static str,
        get: fn(&C) -> &str,
        accepts: fn(&str) -> bool,
        message: &'static str,
    ) -> Self {
        Self {
            field,
            get,
            accepts,
            message,
        }
    }
}

#[async_trait]
impl<C: Sync> FieldRule<C> for OneOf<C> {
    async fn check(&self, ctx: &C) -> JobBoardResult<Option<Violation>> {
        if !(self.accepts)((self.get)(ctx)) {
            Ok(Some(Violation::bad_request(self.field, self.message)))
        } else {
            Ok(None)
        }
    }
}
