use actix_web::{web, Error, HttpResponse};
use actix_multipart::Multipart;
use serde_json::json;
use std::io::Write;
use log::{error, info};
use shared::{ScanOutcome, ScanReport, TumorClass};
use futures::{StreamExt, TryStreamExt};
use crate::pipeline::{ScanError, Scanner};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/scan").route(web::post().to(handle_scan)))
        .service(web::resource("/api/classes").route(web::get().to(list_classes)))
        .service(web::resource("/api/health").route(web::get().to(health)));
}

async fn handle_scan(
    scanner: web::Data<Scanner>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut results = Vec::new();
    let mut uploads: Vec<(Option<String>, Vec<u8>)> = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            image_data.write_all(&data)?;
        }
        if !image_data.is_empty() {
            uploads.push((file_name, image_data));
        }
    }

    for (file_name, image_data) in &uploads {
        match scanner.scan(image_data) {
            Ok(outcome) => {
                info!("Scan outcome for {:?}: {:?}", file_name, outcome);
                let report = ScanReport {
                    file_name: file_name.clone(),
                    message: outcome_message(&outcome),
                    outcome,
                };
                results.push(json!({ "report": report }));
            }
            Err(e) => {
                let error_msg = match &e {
                    ScanError::Load(_) => format!("Invalid image upload: {}", e),
                    ScanError::Classifier(_) => format!("Classification failed: {}", e),
                };
                error!("{}", error_msg);

                results.push(json!({
                    "file_name": file_name,
                    "error": error_msg
                }));
            }
        }
    }

    Ok(HttpResponse::Ok().json(json!({
        "results": results
    })))
}

/// Human-readable counterpart of an outcome. Only a classified outcome names
/// a tumor class; the other messages give guidance without a prediction.
fn outcome_message(outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::Rejected { .. } => {
            "The image was not recognized as a brain MRI. Please upload a valid brain MRI scan."
                .to_string()
        }
        ScanOutcome::LowConfidence => {
            "The model is not confident enough to give a reliable prediction for this image."
                .to_string()
        }
        ScanOutcome::Classified { label, confidence } => {
            format!("Predicted tumor type: {} (confidence {:.2})", label, confidence)
        }
    }
}

async fn list_classes() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "classes": TumorClass::ALL }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
