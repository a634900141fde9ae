//! Rule sets for registration, login and profile updates.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use jobboard_domain::repositories::UserRepository;
use jobboard_errors::JobBoardResult;

use crate::handlers::auth::{LoginInput, RegisterInput};
use crate::handlers::users::UpdateUserInput;

use super::gate::{Email, FieldRule, MinLength, Required, Violation};

/// Registration payload plus the user store for the uniqueness check.
pub struct RegisterAccess {
    pub body: RegisterInput,
    pub users: Arc<dyn UserRepository>,
}

/// Fails when another account already uses the submitted email.
pub struct EmailNotTaken;

#[async_trait]
impl FieldRule<RegisterAccess> for EmailNotTaken {
    async fn check(&self, ctx: &RegisterAccess) -> JobBoardResult<Option<Violation>> {
        if ctx.users.find_by_email(&ctx.body.email).await?.is_some() {
            return Ok(Some(Violation::bad_request(
                "email",
                "Email already exists",
            )));
        }
        Ok(None)
    }
}

pub fn register_rules() -> Vec<Box<dyn FieldRule<RegisterAccess>>> {
    vec![
        Box::new(Required::new(
            "name",
            |ctx: &RegisterAccess| ctx.body.name.as_str(),
            "Name is required",
        )),
        Box::new(Required::new(
            "email",
            |ctx: &RegisterAccess| ctx.body.email.as_str(),
            "Email is required",
        )),
        Box::new(Email::new(
            "email",
            |ctx: &RegisterAccess| ctx.body.email.as_str(),
            "Invalid Email format",
        )),
        Box::new(EmailNotTaken),
        Box::new(Required::new(
            "password",
            |ctx: &RegisterAccess| ctx.body.password.as_str(),
            "Password is required",
        )),
        Box::new(MinLength::new(
            "password",
            |ctx: &RegisterAccess| ctx.body.password.as_str(),
            8,
            "Password must be at least 8 character long",
        )),
        Box::new(Required::new(
            "location",
            |ctx: &RegisterAccess| ctx.body.location.as_str(),
            "Location is required",
        )),
        Box::new(Required::new(
            "lastName",
            |ctx: &RegisterAccess| ctx.body.last_name.as_str(),
            "Last name is required",
        )),
    ]
}

pub fn login_rules() -> Vec<Box<dyn FieldRule<LoginInput>>> {
    vec![
        Box::new(Required::new(
            "email",
            |input: &LoginInput| input.email.as_str(),
            "Email is required",
        )),
        Box::new(Email::new(
            "email",
            |input: &LoginInput| input.email.as_str(),
            "Invalid email format",
        )),
        Box::new(Required::new(
            "password",
            |input: &LoginInput| input.password.as_str(),
            "Password is required",
        )),
    ]
}

/// Profile-update payload, the requester's id and the user store. The
/// uniqueness check must not flag the requester's own record.
pub struct ProfileUpdateAccess {
    pub body: UpdateUserInput,
    pub user_id: Uuid,
    pub users: Arc<dyn UserRepository>,
}

/// Fails when the submitted email belongs to a different account.
pub struct EmailNotTakenByOther;

#[async_trait]
impl FieldRule<ProfileUpdateAccess> for EmailNotTakenByOther {
    async fn check(&self, ctx: &ProfileUpdateAccess) -> JobBoardResult<Option<Violation>> {
        if let Some(existing) = ctx.users.find_by_email(&ctx.body.email).await? {
            if existing.id != ctx.user_id {
                return Ok(Some(Violation::bad_request(
                    "email",
                    "Email already exists",
                )));
            }
        }
        Ok(None)
    }
}

pub fn update_user_rules() -> Vec<Box<dyn FieldRule<ProfileUpdateAccess>>> {
    vec![
        Box::new(Required::new(
            "name",
            |ctx: &ProfileUpdateAccess| ctx.body.name.as_str(),
            "Name is required",
        )),
        Box::new(Required::new(
            "email",
            |ctx: &ProfileUpdateAccess| ctx.body.email.as_str(),
            "Email is required",
        )),
        Box::new(Email::new(
            "email",
            |ctx: &ProfileUpdateAccess| ctx.body.email.as_str(),
            "Invalid Email format",
        )),
        Box::new(EmailNotTakenByOther),
        Box::new(Required::new(
            "location",
            |ctx: &ProfileUpdateAccess| ctx.body.location.as_str(),
            "Location is required",
        )),
        Box::new(Required::new(
            "lastName",
            |ctx: &ProfileUpdateAccess| ctx.body.last_name.as_str(),
            "Last name is required",
        )),
    ]
}
