//! Operator-facing handlers: role management, pool authorization, and cache
//! introspection.

use authz_types::{
    methods::{
        pools::AllowedPoolsResponse,
        system::{
            CacheStatusResponse, ClearCacheResponse, ListRolesResponse, ReadRoleResponse,
            RemoveRoleResponse, WriteRoleParams, WriteRoleResponse,
        },
    },
    role::Role,
};

use crate::{
    context::AppContext,
    convert,
    error::{Error, ErrorType},
    pools,
};

pub async fn handle_write_role(
    ctx: &AppContext,
    params: WriteRoleParams,
) -> Result<WriteRoleResponse, Error> {
    let role = params.role;
    if role.name.is_empty() {
        return Err(ErrorType::BadRequest("A role name is required".to_string()).into());
    }
    if let Some(rule) = convert::first_unconvertible(&role) {
        return Err(ErrorType::BadRequest(format!(
            "Legacy rule `{rule}` matches no registered endpoint"
        ))
        .into());
    }
    ensure_mutable(ctx, &role.name).await?;

    ctx.repos.role.save(&role).await?;
    // Drop any cached copy so the next check sees the new document.
    ctx.cache.remove(&role.name);
    Ok(WriteRoleResponse { role })
}

pub async fn handle_list_roles(ctx: &AppContext) -> Result<ListRolesResponse, Error> {
    let roles = ctx.repos.role.list().await?;
    Ok(ListRolesResponse { roles })
}

pub async fn handle_read_role(ctx: &AppContext, name: &str) -> Result<ReadRoleResponse, Error> {
    let role = lookup_role(ctx, name).await?;
    Ok(ReadRoleResponse { role })
}

pub async fn handle_remove_role(
    ctx: &AppContext,
    name: &str,
) -> Result<RemoveRoleResponse, Error> {
    ensure_mutable(ctx, name).await?;
    if !ctx.repos.role.remove(name).await? {
        return Err(ErrorType::NotFound(format!("Role `{name}` not found")).into());
    }
    ctx.cache.remove(name);
    Ok(RemoveRoleResponse {
        role: name.to_string(),
    })
}

/// The pools in which the caller, identified by the same headers as a check,
/// may create workflows.
pub async fn handle_allowed_pools(
    ctx: &AppContext,
    role_names: Vec<String>,
) -> Result<AllowedPoolsResponse, Error> {
    let roles = ctx.handler.load_roles(&role_names).await?;
    let pool_names = ctx.repos.pool.list_names().await?;
    Ok(AllowedPoolsResponse {
        pools: pools::allowed_pools(&roles, &pool_names),
    })
}

pub fn handle_cache_status(ctx: &AppContext) -> CacheStatusResponse {
    CacheStatusResponse {
        enabled: ctx.cache.enabled(),
        size: ctx.cache.len(),
        hits: ctx.cache.hits(),
        misses: ctx.cache.misses(),
    }
}

pub fn handle_clear_cache(ctx: &AppContext) -> ClearCacheResponse {
    ClearCacheResponse {
        cleared: ctx.cache.clear(),
    }
}

async fn lookup_role(ctx: &AppContext, name: &str) -> Result<Role, Error> {
    ctx.repos
        .role
        .lookup(name)
        .await?
        .ok_or_else(|| ErrorType::NotFound(format!("Role `{name}` not found")).into())
}

async fn ensure_mutable(ctx: &AppContext, name: &str) -> Result<(), Error> {
    if let Some(existing) = ctx.repos.role.lookup(name).await? {
        if existing.immutable {
            return Err(ErrorType::ImmutableRole(name.to_string()).into());
        }
    }
    Ok(())
}
