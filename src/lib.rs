#![doc = "The `taskly` library crate."]
#![doc = ""]
#![doc = "User registration and login with bearer tokens, plus task CRUD, served over"]
#![doc = "actix-web. Handlers depend on services, services depend on the store ports in"]
#![doc = "[`store`], and the binary (`main.rs`) wires a Postgres store into the app."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;

use std::sync::Arc;

use actix_web::web;

use crate::auth::TokenService;
use crate::config::OwnershipPolicy;
use crate::services::{TaskService, UserService};
use crate::store::{TaskStore, UserStore};

pub use crate::config::Config;
pub use crate::error::AppError;

/// The services shared by every worker, ready to register as app data.
#[derive(Clone)]
pub struct AppServices {
    pub users: web::Data<UserService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenService>,
}

impl AppServices {
    /// Builds the services over a store that implements both ports.
    pub fn new<S>(store: Arc<S>, config: &Config) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        Self::from_parts(
            store.clone(),
            store,
            TokenService::new(config.jwt_secret.clone()),
            config.bcrypt_cost,
            config.task_ownership,
        )
    }

    pub fn from_parts(
        user_store: Arc<dyn UserStore>,
        task_store: Arc<dyn TaskStore>,
        tokens: TokenService,
        bcrypt_cost: u32,
        ownership: OwnershipPolicy,
    ) -> Self {
        Self {
            users: web::Data::new(UserService::new(user_store, tokens.clone(), bcrypt_cost)),
            tasks: web::Data::new(TaskService::new(task_store, ownership)),
            tokens: web::Data::new(tokens),
        }
    }

    /// Registers the services as app data and mounts all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.users.clone())
            .app_data(self.tasks.clone())
            .app_data(self.tokens.clone())
            .configure(routes::config);
    }
}
