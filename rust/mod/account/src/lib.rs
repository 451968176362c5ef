//! Account module: registration, email verification, login sessions and
//! role administration.
//!
//! # Resources
//!
//! - **User**: registered account with an argon2id password hash
//! - **Role**: named role; `SuperAdmin`, `Admin` and `User` are built in
//! - **Session**: one row per login, referenced by the token's `sid`
//!
//! # Usage
//!
//! ```ignore
//! use account::{AccountModule, service::{AccountConfig, AccountService}};
//!
//! let svc = AccountService::new(sql, kv, Arc::new(LogMailer), AccountConfig::default())?;
//! let module = AccountModule::new(svc.clone());
//! let router = account::api::authenticate(module.routes(), svc);
//! ```

pub mod api;
pub mod mailer;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use homecook_core::Module;

use crate::service::AccountService;

/// Account module implementing the Module trait.
pub struct AccountModule {
    service: Arc<AccountService>,
}

impl AccountModule {
    pub fn new(service: Arc<AccountService>) -> Self {
        Self { service }
    }
}

impl Module for AccountModule {
    fn name(&self) -> &str {
        "account"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
