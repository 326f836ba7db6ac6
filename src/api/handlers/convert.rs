use anyhow::{Context, Result, anyhow};
use log::info;
use rocket::form::{Errors, Form};
use rocket::fs::{NamedFile, TempFile};
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{FromForm, Responder, get, post, routes};
use std::time::Instant;
use tokio::task::spawn_blocking;

use crate::api::AppResult;
use crate::common::{ARCHIVE_FILE_NAME, VALID_INPUT_EXTENSIONS};
use crate::config::APP_CONFIG;
use crate::conversion::archive::write_archive;
use crate::conversion::codec::ImageCrateCodec;
use crate::conversion::pipeline::{
    ConversionOutcome, InputFile, clear_output_folder, convert_batch,
};

fn render_page(download_link: Option<&str>) -> RawHtml<String> {
    let accept = VALID_INPUT_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    let download_section = match download_link {
        Some(link) => format!(
            r#"<br><br>
    <a href="{}">
        <button>Download Converted Images</button>
    </a>"#,
            link
        ),
        None => String::new(),
    };

    RawHtml(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>JPEG to PNG Converter</title>
</head>
<body style="font-family: Arial; text-align: center; margin-top: 50px;">
    <h2>JPEG to PNG Converter</h2>
    <form method="POST" action="/convert" enctype="multipart/form-data">
        <input type="file" name="images" multiple accept="{accept}" required><br><br>
        <button type="submit">Convert</button>
    </form>
    {download_section}
</body>
</html>"#
    ))
}

#[get("/")]
pub fn index() -> RawHtml<String> {
    render_page(None)
}

#[derive(FromForm, Debug)]
pub struct UploadForm<'r> {
    #[field(name = "images")]
    pub images: Vec<TempFile<'r>>,
}

#[derive(Responder)]
pub enum ConvertResponse {
    Page(RawHtml<String>),
    #[response(status = 400)]
    NoFiles(&'static str),
}

#[post("/convert", data = "<form>")]
pub async fn convert(form: Result<Form<UploadForm<'_>>, Errors<'_>>) -> AppResult<ConvertResponse> {
    let inner_form = match form {
        Ok(form) => form.into_inner(),
        Err(errors) => {
            let error_chain = errors
                .iter()
                .map(|e| anyhow!(e.to_string()))
                .reduce(|acc, e| acc.context(e.to_string()));

            return match error_chain {
                Some(chain) => Err(chain.context("Failed to parse form").into()),
                None => Err(anyhow!("Failed to parse form with unknown error").into()),
            };
        }
    };

    let mut inputs = Vec::with_capacity(inner_form.images.len());
    for file in inner_form.images.iter() {
        // Browsers submit a single nameless zero-length part when no file
        // was selected; such parts do not count toward the batch.
        if file.len() == 0 && file.name().is_none() {
            continue;
        }
        let stem = file.name().map(str::to_owned).unwrap_or_default();
        let bytes = match file.path() {
            Some(path) => tokio::fs::read(path)
                .await
                .context(format!("failed to read upload '{}'", stem))?,
            None => Vec::new(),
        };
        inputs.push(InputFile { stem, bytes });
    }

    if inputs.is_empty() {
        return Ok(ConvertResponse::NoFiles("No files selected"));
    }

    let start_time = Instant::now();
    let batch_len = inputs.len();

    let outcomes = spawn_blocking(move || -> Result<Vec<ConversionOutcome>> {
        let config = &*APP_CONFIG;
        clear_output_folder(&config.output_folder)?;
        let outcomes = convert_batch(&ImageCrateCodec, inputs, &config.output_folder);
        write_archive(&config.output_folder, &config.archive_path())?;
        Ok(outcomes)
    })
    .await??;

    let converted = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, ConversionOutcome::Converted { .. }))
        .count();
    let duration = format!("{:?}", start_time.elapsed());
    info!(duration = &*duration; "Converted batch: {}/{} files", converted, batch_len);

    Ok(ConvertResponse::Page(render_page(Some("/download"))))
}

#[derive(Responder)]
pub struct ArchiveAttachment {
    file: NamedFile,
    content_disposition: Header<'static>,
}

#[get("/download")]
pub async fn download() -> Option<ArchiveAttachment> {
    let file = NamedFile::open(APP_CONFIG.archive_path()).await.ok()?;
    Some(ArchiveAttachment {
        file,
        content_disposition: Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
        ),
    })
}

pub fn generate_convert_routes() -> Vec<rocket::Route> {
    routes![index, convert, download]
}
