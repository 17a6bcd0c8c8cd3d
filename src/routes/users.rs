/// User Routes

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::pagination::{PageQuery, PageRequest};
use crate::response::{ok, ok_empty, ok_with_paging};
use crate::users::{CreateUserRequest, UpdateUserRequest, UserService};

/// POST /api/v1/users
///
/// # Errors
/// - 400: Validation errors
/// - 409: Username already taken
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let created = users.create(form.into_inner()).await?;
    Ok(ok(created))
}

/// GET /api/v1/users?page=&pageSize=
pub async fn list_users(
    query: web::Query<PageQuery>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::parse(&query)?;
    let (items, paging) = users.list(page).await?;

    Ok(ok_with_paging(items, paging))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    path: web::Path<i64>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let user = users.get(path.into_inner()).await?;
    Ok(ok(user))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    path: web::Path<i64>,
    form: web::Json<UpdateUserRequest>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let user = users.update(path.into_inner(), form.into_inner()).await?;
    Ok(ok(user))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    path: web::Path<i64>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    users.delete(path.into_inner()).await?;
    Ok(ok_empty())
}
