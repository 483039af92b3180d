use std::collections::{BTreeMap, HashMap};

use actix_multipart::Multipart;
use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use futures_util::{future::LocalBoxFuture, TryStreamExt};
use serde_json::Value;

use crate::{
    constants::DEFAULT_MAX_UPLOAD_BYTES,
    entities::{
        post::{StorePostRequest, UpdatePostRequest},
        upload::{ImageInput, UploadedFile},
    },
    errors::{AppError, FieldErrors},
    AppState,
};

const IMAGE_FIELD: &str = "image";
const METHOD_FIELD: &str = "_method";

#[derive(Debug, Clone)]
pub enum FormValue {
    Text(String),
    File(UploadedFile),
}

/// Request body decoded from multipart, urlencoded or JSON input.
#[derive(Debug, Default)]
pub struct PostForm {
    fields: HashMap<String, FormValue>,
}

impl PostForm {
    pub fn from_fields(fields: impl IntoIterator<Item = (String, FormValue)>) -> Self {
        PostForm { fields: fields.into_iter().collect() }
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            Some(FormValue::Text(value)) => Some(value.trim().to_string()),
            _ => None,
        }
    }

    /// Empty values count as absent, any other text is a non-file.
    pub fn image(&self, name: &str) -> Option<ImageInput> {
        match self.fields.get(name)? {
            FormValue::File(file) if file.is_blank() => None,
            FormValue::File(file) => Some(ImageInput::File(file.clone())),
            FormValue::Text(value) if value.trim().is_empty() => None,
            FormValue::Text(_) => Some(ImageInput::NotAFile),
        }
    }

    pub fn method_override(&self) -> Option<String> {
        self.text(METHOD_FIELD).map(|method| method.to_ascii_uppercase())
    }

    /// Submitted text fields to repopulate a form after a failed submit.
    pub fn old_input(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .filter_map(|(name, value)| match value {
                FormValue::Text(text) => Some((name.clone(), text.clone())),
                FormValue::File(_) => None,
            })
            .collect()
    }

    pub fn into_store_request(self) -> StorePostRequest {
        StorePostRequest {
            title: self.text("title").unwrap_or_default(),
            description: self.text("description").unwrap_or_default(),
            image: self.image(IMAGE_FIELD),
        }
    }

    pub fn into_update_request(self) -> UpdatePostRequest {
        UpdatePostRequest {
            title: self.text("title"),
            description: self.text("description"),
            image: self.image(IMAGE_FIELD),
        }
    }
}

impl FromRequest for PostForm {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let mut payload = payload.take();

        Box::pin(async move {
            let content_type = req.content_type().to_ascii_lowercase();

            if content_type.starts_with("multipart/form-data") {
                let limit = req
                    .app_data::<web::Data<AppState>>()
                    .map(|state| state.max_upload_bytes)
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
                let multipart = Multipart::new(req.headers(), payload);
                read_multipart(multipart, limit).await
            } else if content_type.starts_with("application/json") {
                let json = web::Json::<serde_json::Map<String, Value>>::from_request(&req, &mut payload)
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {}", e)))?;
                Ok(from_json(json.into_inner()))
            } else if content_type.starts_with("application/x-www-form-urlencoded") {
                let form = web::Form::<Vec<(String, String)>>::from_request(&req, &mut payload)
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed form body: {}", e)))?;
                Ok(PostForm::from_fields(
                    form.into_inner()
                        .into_iter()
                        .map(|(name, value)| (name, FormValue::Text(value))),
                ))
            } else if content_type.is_empty() {
                Ok(PostForm::default())
            } else {
                Err(AppError::BadRequest(format!("Unsupported content type: {}", content_type)))
            }
        })
    }
}

async fn read_multipart(mut multipart: Multipart, limit: usize) -> Result<PostForm, AppError> {
    let mut fields = HashMap::new();
    let mut rejected = FieldErrors::new();

    while let Some(mut field) = multipart.try_next().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_owned());

        // Count everything the client sends but stop buffering past the limit.
        let mut bytes = web::BytesMut::new();
        let mut size = 0usize;
        while let Some(chunk) = field.try_next().await? {
            size += chunk.len();
            if size <= limit {
                bytes.extend_from_slice(&chunk);
            }
        }

        let value = match file_name {
            Some(file_name) => FormValue::File(UploadedFile {
                file_name: Some(file_name),
                content_type,
                bytes: bytes.freeze(),
                size,
                limit,
            }),
            None if size > limit => {
                rejected.insert(name.clone(), vec![format!(
                    "The {} field must not be greater than {} kilobytes.",
                    name,
                    limit / 1024
                )]);
                continue;
            }
            None => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => FormValue::Text(text),
                Err(_) => {
                    rejected.insert(name.clone(), vec![format!("The {} field must be valid UTF-8 text.", name)]);
                    continue;
                }
            },
        };
        fields.insert(name, value);
    }

    if !rejected.is_empty() {
        tracing::warn!(fields = ?rejected.keys().collect::<Vec<_>>(), "Multipart text fields rejected");
        return Err(AppError::ValidationFailed(rejected));
    }

    Ok(PostForm { fields })
}

fn from_json(map: serde_json::Map<String, Value>) -> PostForm {
    PostForm::from_fields(map.into_iter().filter_map(|(name, value)| match value {
        Value::Null => None,
        Value::String(text) => Some((name, FormValue::Text(text))),
        other => Some((name, FormValue::Text(other.to_string()))),
    }))
}
