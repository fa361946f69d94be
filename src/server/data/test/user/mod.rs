use crate::server::{
    data::user::UserRepository,
    model::user::{CreateUserParams, UserFilter},
};
use entity::sea_orm_active_enums::Role;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod list;
mod set_permissions;
