/**
 * Upload Handlers
 *
 * Multipart PDF intake and retrieval for books and chapters.
 *
 * # Upload Flow
 *
 * 1. Walk the multipart fields in order. The `pdf` field is checked for an
 *    `application/pdf` content type and streamed to disk chunk by chunk
 *    through a size-limited [`PdfWriter`]; other fields are read as text.
 * 2. Validate the text fields.
 * 3. Write the database row.
 *
 * Once the file is on disk, any later failure removes it again before the
 * error is returned.
 */

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{
        multipart::{Field, Multipart},
        Path, State,
    },
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    response::{Json, Response},
};
use bytes::Bytes;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::backend::catalog::db::{self, PdfAttachment};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::responses::MessageResponse;
use crate::backend::server::state::AppState;
use crate::backend::uploads::pdf::{count_pages, is_pdf_content_type, PDF_CONTENT_TYPE};
use crate::backend::uploads::storage::{
    display_name, PdfKind, PdfStore, PdfWriter, StoreError, StoredPdf,
};
use crate::shared::catalog::{Book, Chapter, NewBook};

/// Multipart field carrying the file
const PDF_FIELD: &str = "pdf";

/// Category given to uploaded books that name none
const DEFAULT_UPLOAD_CATEGORY: &str = "Uncategorized";

const READ_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Serialize, Debug)]
pub struct BookUploadResponse {
    pub message: String,
    pub book: Book,
}

#[derive(Serialize, Debug)]
pub struct ChapterUploadResponse {
    pub message: String,
    pub chapter: Chapter,
}

/// Text fields and the stored file of one multipart request
#[derive(Debug, Default)]
struct UploadForm {
    fields: HashMap<String, String>,
    pdf: Option<StoredPdf>,
}

impl UploadForm {
    fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}

/// POST /api/upload/pdf
///
/// Creates a book from the uploaded PDF and the `title`, `author`,
/// `description`, `category` and `coverImage` fields.
///
/// # Errors
///
/// * `400 Bad Request` - No file, or title/author missing
/// * `413 Payload Too Large` - File over the book limit
/// * `415 Unsupported Media Type` - File is not declared as a PDF
pub async fn upload_book_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<BookUploadResponse>)> {
    let form = read_form(
        &state.pdfs,
        multipart,
        PdfKind::Book,
        state.config.max_book_pdf_bytes,
    )
    .await?;
    let pdf = form
        .pdf
        .clone()
        .ok_or_else(|| BackendError::bad_request("No PDF file uploaded"))?;

    match create_book_from_upload(&state, &form, &pdf).await {
        Ok(book) => {
            tracing::info!(
                "Uploaded PDF for new book {} ({} bytes, {} pages)",
                book.id,
                pdf.size,
                book.page_count
            );
            Ok((
                StatusCode::CREATED,
                Json(BookUploadResponse {
                    message: "PDF uploaded successfully".to_string(),
                    book,
                }),
            ))
        }
        Err(e) => {
            state.pdfs.remove(&pdf.relative_path).await;
            Err(e)
        }
    }
}

async fn create_book_from_upload(
    state: &AppState,
    form: &UploadForm,
    pdf: &StoredPdf,
) -> ApiResult<Book> {
    let category = form
        .text("category")
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_CATEGORY.to_string());
    let draft = NewBook {
        title: form.text("title"),
        author: form.text("author"),
        description: form.text("description"),
        cover_image: form.text("coverImage"),
        category: Some(category),
    }
    .validate()?;

    let pages = count_pages(&pdf.absolute_path).await;
    let attachment = attachment(pdf);
    Ok(db::create_book(&state.db, &draft, Some((&attachment, pages))).await?)
}

/// POST /api/upload/chapter-pdf
///
/// Attaches the uploaded PDF to the chapter named by `chapterId`, replacing
/// and deleting any previous file.
pub async fn upload_chapter_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ChapterUploadResponse>> {
    let form = read_form(
        &state.pdfs,
        multipart,
        PdfKind::Chapter,
        state.config.max_chapter_pdf_bytes,
    )
    .await?;
    let pdf = form
        .pdf
        .clone()
        .ok_or_else(|| BackendError::bad_request("No PDF file uploaded"))?;

    match attach_chapter_pdf(&state, &form, &pdf).await {
        Ok(chapter) => {
            tracing::info!("Uploaded PDF for chapter {} ({} bytes)", chapter.id, pdf.size);
            Ok(Json(ChapterUploadResponse {
                message: "Chapter PDF uploaded successfully".to_string(),
                chapter,
            }))
        }
        Err(e) => {
            state.pdfs.remove(&pdf.relative_path).await;
            Err(e)
        }
    }
}

async fn attach_chapter_pdf(
    state: &AppState,
    form: &UploadForm,
    pdf: &StoredPdf,
) -> ApiResult<Chapter> {
    let chapter_id: i64 = form
        .text("chapterId")
        .and_then(|id| id.trim().parse().ok())
        .ok_or_else(|| BackendError::bad_request("chapterId is required"))?;

    let previous = db::set_chapter_pdf(&state.db, chapter_id, Some(&attachment(pdf)))
        .await?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))?;
    if let Some(previous) = previous {
        state.pdfs.remove(&previous).await;
    }

    db::get_chapter(&state.db, chapter_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))
}

/// GET /api/upload/pdf/{book_id}
pub async fn get_book_pdf(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> ApiResult<Response> {
    let book = db::get_book(&state.db, book_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Book not found"))?;
    let path = book
        .pdf_path
        .ok_or_else(|| BackendError::not_found("No PDF attached to this book"))?;

    stream_pdf(&state.pdfs, &path, book.pdf_file_name.as_deref()).await
}

/// GET /api/upload/chapter-pdf/{chapter_id}
pub async fn get_chapter_pdf(
    State(state): State<AppState>,
    Path(chapter_id): Path<i64>,
) -> ApiResult<Response> {
    let chapter = db::get_chapter(&state.db, chapter_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))?;
    let path = chapter
        .pdf_path
        .ok_or_else(|| BackendError::not_found("No PDF attached to this chapter"))?;

    stream_pdf(&state.pdfs, &path, chapter.pdf_file_name.as_deref()).await
}

/// DELETE /api/upload/pdf/{book_id}
///
/// Removes the book itself along with its PDF and its chapters' PDFs.
pub async fn delete_book_pdf(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let paths = db::delete_book(&state.db, book_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Book not found"))?;
    state.pdfs.remove_all(&paths).await;

    tracing::info!("Deleted book {} through the upload endpoint", book_id);
    Ok(Json(MessageResponse::new("PDF and book deleted successfully")))
}

/// DELETE /api/upload/chapter-pdf/{chapter_id}
///
/// Detaches the PDF; the chapter row stays.
pub async fn delete_chapter_pdf(
    State(state): State<AppState>,
    Path(chapter_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let chapter = db::get_chapter(&state.db, chapter_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))?;
    if chapter.pdf_path.is_none() {
        return Err(BackendError::not_found("No PDF attached to this chapter"));
    }

    let previous = db::set_chapter_pdf(&state.db, chapter_id, None)
        .await?
        .ok_or_else(|| BackendError::not_found("Chapter not found"))?;
    if let Some(path) = previous {
        state.pdfs.remove(&path).await;
    }
    Ok(Json(MessageResponse::new("Chapter PDF deleted successfully")))
}

fn attachment(pdf: &StoredPdf) -> PdfAttachment {
    PdfAttachment {
        path: pdf.relative_path.clone(),
        file_name: pdf.file_name.clone(),
        size: i64::try_from(pdf.size).unwrap_or(i64::MAX),
    }
}

// ----------------------------------------------------------------------------
// Multipart intake
// ----------------------------------------------------------------------------

async fn read_form(
    store: &PdfStore,
    mut multipart: Multipart,
    kind: PdfKind,
    limit: usize,
) -> ApiResult<UploadForm> {
    let mut form = UploadForm::default();
    if let Err(e) = collect_fields(store, &mut multipart, kind, limit, &mut form).await {
        if let Some(pdf) = form.pdf.take() {
            store.remove(&pdf.relative_path).await;
        }
        return Err(e);
    }
    Ok(form)
}

async fn collect_fields(
    store: &PdfStore,
    multipart: &mut Multipart,
    kind: PdfKind,
    limit: usize,
    form: &mut UploadForm,
) -> ApiResult<()> {
    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name != PDF_FIELD {
            let value = field.text().await?;
            form.fields.insert(name, value);
            continue;
        }

        if form.pdf.is_some() {
            return Err(BackendError::bad_request("Only one PDF file may be uploaded"));
        }
        if !is_pdf_content_type(field.content_type()) {
            tracing::warn!(
                "Rejected upload with content type {:?}",
                field.content_type()
            );
            return Err(BackendError::UnsupportedMediaType(
                "Only PDF files are allowed".to_string(),
            ));
        }

        let original_name = field.file_name().unwrap_or("document.pdf").to_string();
        let writer = store
            .create(kind, &original_name, limit)
            .await
            .map_err(store_error)?;
        form.pdf = Some(stream_field(&mut field, writer).await?);
    }
    Ok(())
}

async fn stream_field(field: &mut Field<'_>, mut writer: PdfWriter) -> ApiResult<StoredPdf> {
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if let Err(e) = writer.write_chunk(&chunk).await {
                    writer.abort().await;
                    return Err(store_error(e));
                }
            }
            Ok(None) => break,
            Err(e) => {
                writer.abort().await;
                return Err(e.into());
            }
        }
    }
    writer.finish().await.map_err(store_error)
}

fn store_error(err: StoreError) -> BackendError {
    match err {
        StoreError::TooLarge { limit } => {
            tracing::warn!("Upload exceeded the {} byte limit", limit);
            BackendError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} MB",
                limit / (1024 * 1024)
            ))
        }
        StoreError::Io(e) => e.into(),
    }
}

// ----------------------------------------------------------------------------
// Retrieval
// ----------------------------------------------------------------------------

async fn stream_pdf(store: &PdfStore, path: &str, file_name: Option<&str>) -> ApiResult<Response> {
    let (file, len) = store.open(path).await?.ok_or_else(|| {
        tracing::warn!("Stored PDF missing on disk: {}", path);
        BackendError::not_found("PDF file not found on server")
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, PDF_CONTENT_TYPE)
        .header(CONTENT_DISPOSITION, content_disposition(file_name))
        .header(CONTENT_LENGTH, len)
        .body(file_body(file))
        .map_err(|e| BackendError::internal(format!("Failed to build PDF response: {}", e)))
}

/// `inline` disposition with a header-safe file name
fn content_disposition(file_name: Option<&str>) -> String {
    let name: String = display_name(file_name.unwrap_or("document.pdf"))
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!("inline; filename=\"{}\"", name)
}

fn file_body(file: File) -> Body {
    let stream = futures_util::stream::unfold(Some(file), |state| async move {
        let mut file = state?;
        let mut buf = vec![0u8; READ_CHUNK_BYTES];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok::<Bytes, std::io::Error>(Bytes::from(buf)), Some(file)))
            }
            Err(e) => Some((Err(e), None)),
        }
    });
    Body::from_stream(stream)
}
