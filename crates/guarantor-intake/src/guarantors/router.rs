use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::attachments::UploadFile;
use super::domain::{
    AttachmentId, GuarantorFilters, GuarantorFormData, GuarantorId, GuarantorStatus, PageRequest,
    UpdateGuarantor,
};
use super::repository::{GuarantorRepository, RepositoryError};
use super::service::{GuarantorService, GuarantorServiceError};

/// Router builder exposing the guarantor REST surface under `/api/v1`.
pub fn guarantor_router<R>(service: Arc<GuarantorService<R>>) -> Router
where
    R: GuarantorRepository + 'static,
{
    Router::new()
        .route("/api/v1/guarantors", get(list_handler::<R>).post(create_handler::<R>))
        .route("/api/v1/guarantors/stats", get(stats_handler::<R>))
        .route("/api/v1/guarantors/recent", get(recent_handler::<R>))
        .route("/api/v1/guarantors/export", get(export_handler::<R>))
        .route(
            "/api/v1/guarantors/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route("/api/v1/guarantors/:id/verify", post(verify_handler::<R>))
        .route(
            "/api/v1/guarantors/:id/attachments",
            get(list_attachments_handler::<R>).post(upload_attachments_handler::<R>),
        )
        .route(
            "/api/v1/guarantors/:id/attachments/:file_id/download",
            get(download_attachment_handler::<R>),
        )
        .route(
            "/api/v1/guarantors/:id/attachments/:file_id",
            delete(delete_attachment_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    status: Option<GuarantorStatus>,
    #[serde(default)]
    submitted_by: Option<String>,
    #[serde(default)]
    date_from: Option<NaiveDate>,
    #[serde(default)]
    date_to: Option<NaiveDate>,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    limit: Option<usize>,
}

impl ListQuery {
    fn filters(&self) -> GuarantorFilters {
        GuarantorFilters {
            search: self.search.clone(),
            status: self.status,
            submitted_by: self.submitted_by.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(10))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentQuery {
    #[serde(default)]
    limit: Option<usize>,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    match service.list(&query.filters(), query.page()) {
        Ok((rows, pagination)) => (
            StatusCode::OK,
            axum::Json(json!({ "data": rows, "pagination": pagination })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    axum::Json(data): axum::Json<GuarantorFormData>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    match service.create(data) {
        Ok(record) => (
            StatusCode::CREATED,
            axum::Json(json!({ "data": record, "success": true })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    entity_response(service.get(&GuarantorId(id)))
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path(id): Path<String>,
    axum::Json(update): axum::Json<UpdateGuarantor>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    entity_response(service.update(&GuarantorId(id), &update))
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    match service.delete(&GuarantorId(id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verify_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    entity_response(service.verify(&GuarantorId(id)))
}

pub(crate) async fn stats_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    entity_response(service.stats())
}

pub(crate) async fn recent_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    entity_response(service.recent(query.limit.unwrap_or(5)))
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    match service.export_csv(&query.filters()) {
        Ok(csv) => {
            let filename = format!(
                "guarantors_export_{}.csv",
                Utc::now().format("%Y-%m-%d")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_attachments_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    entity_response(service.attachments(&GuarantorId(id)))
}

pub(crate) async fn upload_attachments_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    let mut files = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload".to_string());
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                match field.bytes().await {
                    Ok(bytes) => files.push(UploadFile {
                        filename,
                        content_type,
                        content: bytes.to_vec(),
                    }),
                    Err(error) => {
                        let payload = json!({ "message": format!("malformed upload: {error}") });
                        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(error) => {
                let payload = json!({ "message": format!("malformed upload: {error}") });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        }
    }

    entity_response(service.upload_attachments(&GuarantorId(id), files))
}

pub(crate) async fn download_attachment_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path((id, file_id)): Path<(String, String)>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    match service.download_attachment(&GuarantorId(id), &AttachmentId(file_id)) {
        Ok(stored) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, stored.meta.file_type.clone()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", stored.meta.filename),
                ),
            ],
            stored.content,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_attachment_handler<R>(
    State(service): State<Arc<GuarantorService<R>>>,
    Path((id, file_id)): Path<(String, String)>,
) -> Response
where
    R: GuarantorRepository + 'static,
{
    match service.delete_attachment(&GuarantorId(id), &AttachmentId(file_id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn entity_response<T: serde::Serialize>(
    result: Result<T, GuarantorServiceError>,
) -> Response {
    match result {
        Ok(value) => (
            StatusCode::OK,
            axum::Json(json!({ "data": value, "success": true })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: GuarantorServiceError) -> Response {
    match error {
        GuarantorServiceError::Validation(errors) => {
            let payload = json!({
                "message": "Validation failed",
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        GuarantorServiceError::NotFound(_) => {
            let payload = json!({ "message": "Guarantor not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        GuarantorServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "message": "Guarantor not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        GuarantorServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "message": "Record already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        GuarantorServiceError::Repository(RepositoryError::Unavailable(detail)) => {
            let payload = json!({ "message": detail });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
