/// Document passthrough to object storage
///
/// POST /docs/{bucket}        - Upload multipart field `file`
/// GET  /docs/{bucket}/{file} - Fetch an uploaded object inline
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use bytes::BytesMut;
use futures_util::stream::StreamExt;
use tracing::{info, warn};
use uuid::Uuid;

use super::models::UploadBody;
use crate::error::GatewayError;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::storage::{validate_key, DEFAULT_CONTENT_TYPE};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024; // 20MB guardrail
const FILE_FIELD: &str = "file";

struct Upload {
    filename: String,
    content_type: String,
    body: BytesMut,
}

/// Pull the `file` field out of the form, draining everything else
async fn read_file_field(mut payload: Multipart) -> Result<Upload, GatewayError> {
    let mut upload = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| GatewayError::invalid_input(format!("invalid multipart body: {e}")))?;

        let is_file = field.name() == Some(FILE_FIELD) && upload.is_none();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let mut body = BytesMut::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| GatewayError::invalid_input(format!("error reading upload: {e}")))?;
            if is_file {
                if body.len() + chunk.len() > MAX_UPLOAD_BYTES {
                    return Err(GatewayError::invalid_input("upload exceeds 20MB limit"));
                }
                body.extend_from_slice(&chunk);
            }
        }

        if is_file {
            let filename = filename
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| GatewayError::invalid_input("filename required"))?;
            upload = Some(Upload {
                filename,
                content_type,
                body,
            });
        }
    }

    upload.ok_or_else(|| GatewayError::invalid_input("file is required"))
}

pub async fn upload(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, GatewayError> {
    let bucket = path.into_inner();
    validate_key(&bucket)?;

    let upload = read_file_field(payload).await?;
    let key = format!("{}-{}", Uuid::new_v4(), upload.filename);
    validate_key(&key)?;

    let size = upload.body.len();
    state
        .storage
        .put(&bucket, &key, upload.body.freeze(), &upload.content_type)
        .await?;

    info!(user_id = %user.caller(), bucket = %bucket, key = %key, size, "Document uploaded");
    Ok(HttpResponse::Created().json(UploadBody {
        message: "File uploaded successfully".to_string(),
        file_url: format!(
            "{}/docs/{}/{}",
            state.gateway_address,
            urlencoding::encode(&bucket),
            urlencoding::encode(&key)
        ),
    }))
}

pub async fn download(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, GatewayError> {
    let (bucket, key) = path.into_inner();
    validate_key(&bucket)?;
    validate_key(&key)?;

    let object = state.storage.get(&bucket, &key).await.map_err(|e| {
        warn!(bucket = %bucket, key = %key, error = %e, "Document fetch failed");
        GatewayError::from(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type(object.content_type)
        .insert_header(inline_disposition(&key))
        .body(object.body))
}

fn inline_disposition(filename: &str) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Inline,
        parameters: vec![DispositionParam::Filename(filename.to_string())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_quotes_awkward_filenames() {
        let value = inline_disposition(r#"q3 "final".txt"#).to_string();
        assert_eq!(value, r#"inline; filename="q3 \"final\".txt""#);
    }
}
