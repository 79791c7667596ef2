// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command surface: line-delimited JSON requests on stdin, one JSON response
// per request on stdout.
//
// Method names and parameter shapes are frozen; the UI shell on the other
// side of the pipe depends on them. Internal errors cross the boundary as
// the short UI strings, never as raw error chains.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use leisedruck_core::error::Result;
use leisedruck_core::human_errors::ui_message;
use leisedruck_core::types::{ContentKind, PageSize, PrintRequest};
use leisedruck_dispatch::surface::SurfaceHost;
use leisedruck_spooler::runner::QueryRunner;

use crate::services::BridgeServices;

/// One inbound command.
#[derive(Debug, Deserialize)]
pub struct Request {
    /// Opaque correlation id, echoed back verbatim.
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// One outbound reply. Exactly one of `result` and `error` is set.
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
        }
    }

    /// Reply for a line that was not a valid request at all.
    pub fn parse_failure(err: &serde_json::Error) -> Self {
        Self::err(Value::Null, format!("malformed request: {err}"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobsParams {
    #[serde(default)]
    printer_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrintParamsParams {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SilentPrintParams {
    content: String,
    #[serde(default)]
    printer_name: Option<String>,
    #[serde(default)]
    image_payload: Option<String>,
    #[serde(default)]
    print_background: Option<bool>,
}

impl SilentPrintParams {
    fn into_request(self, kind: ContentKind) -> PrintRequest {
        let mut request = PrintRequest::new(kind, self.content);
        request.printer_name = self.printer_name;
        request.image_payload = self.image_payload;
        request.print_background = self.print_background;
        request
    }
}

/// Route one request to the backend services.
pub async fn dispatch<R, H>(services: &BridgeServices<R, H>, request: Request) -> Response
where
    R: QueryRunner + Clone,
    H: SurfaceHost,
{
    let Request { id, method, params } = request;
    match method.as_str() {
        "get-printers" => reply(id, services.get_printers().await),

        "get-print-jobs" => match parse_params::<JobsParams>(params) {
            Ok(p) => reply(id, services.get_print_jobs(p.printer_name.as_deref()).await),
            Err(e) => Response::err(id, e),
        },

        "set-print-params" => match parse_params::<PrintParamsParams>(params) {
            Ok(p) => {
                let size = services.set_print_params(PageSize {
                    width: p.width,
                    height: p.height,
                });
                reply(id, Ok(size))
            }
            Err(e) => Response::err(id, e),
        },

        "silent-print-qrcode" => match parse_params::<SilentPrintParams>(params) {
            Ok(p) => reply(
                id,
                services
                    .silent_print_qrcode(p.into_request(ContentKind::QrCode))
                    .await
                    .map(|report| report.printer_name),
            ),
            Err(e) => Response::err(id, e),
        },

        "silent-print-barcode" => match parse_params::<SilentPrintParams>(params) {
            Ok(p) => reply(
                id,
                services
                    .silent_print_barcode(p.into_request(ContentKind::Barcode))
                    .await
                    .map(|report| report.printer_name),
            ),
            Err(e) => Response::err(id, e),
        },

        other => {
            warn!(method = other, "unknown command");
            Response::err(id, format!("unknown method: {other}"))
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> std::result::Result<T, String> {
    serde_json::from_value(params).map_err(|e| format!("invalid params: {e}"))
}

/// Serialize a backend outcome, mapping errors to their UI strings.
fn reply<T: Serialize>(id: Value, outcome: Result<T>) -> Response {
    match outcome {
        Ok(value) => match serde_json::to_value(value) {
            Ok(json) => Response::ok(id, json),
            Err(e) => Response::err(id, format!("serialization failed: {e}")),
        },
        Err(e) => Response::err(id, ui_message(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use serde_json::json;

    use leisedruck_core::config::AppConfig;
    use leisedruck_spooler::testing::ScriptedRunner;

    use crate::services::test_support::RecordingHost;

    const TWO_PRINTERS: &str = r#"[{"Name":"HP-Office","Default":true,"PrinterStatus":3},
         {"Name":"Canon-Label","Default":false,"PrinterStatus":3}]"#;

    fn services(runner: ScriptedRunner) -> (BridgeServices<ScriptedRunner, RecordingHost>, RecordingHost) {
        let host = RecordingHost::default();
        let services = BridgeServices::new(
            runner,
            host.clone(),
            &AppConfig::default(),
            PathBuf::from("/opt/leisedruck/static"),
        );
        (services, host)
    }

    fn request(id: u64, method: &str, params: Value) -> Request {
        Request {
            id: json!(id),
            method: method.into(),
            params,
        }
    }

    #[tokio::test]
    async fn get_printers_returns_the_listing() {
        let (services, _) =
            services(ScriptedRunner::new().on("ConvertTo-Json", Ok(TWO_PRINTERS.into())));

        let response = dispatch(&services, request(1, "get-printers", Value::Null)).await;
        assert_eq!(response.id, json!(1));
        assert!(response.error.is_none());

        let printers = response.result.expect("result");
        assert_eq!(printers.as_array().expect("array").len(), 2);
        assert_eq!(printers[0]["name"], "HP-Office");
        assert_eq!(printers[0]["is_default"], true);
    }

    #[tokio::test]
    async fn get_print_jobs_accepts_an_optional_printer_scope() {
        let (services, _) = services(ScriptedRunner::new().on(
            "Get-PrintJob -PrinterName 'HP-Office'",
            Ok(r#"{"Id":3,"DocumentName":"labels.pdf","PrinterName":"HP-Office"}"#.into()),
        ));

        let response = dispatch(
            &services,
            request(2, "get-print-jobs", json!({"printerName": "HP-Office"})),
        )
        .await;
        let jobs = response.result.expect("result");
        assert_eq!(jobs[0]["id"], 3);
    }

    #[tokio::test]
    async fn query_failures_surface_as_fetch_failed() {
        let (services, _) = services(ScriptedRunner::new().on(
            "ConvertTo-Json",
            Err(leisedruck_core::error::LeisedruckError::ShellQuery(
                "powershell exited 1".into(),
            )),
        ));

        let response = dispatch(&services, request(3, "get-printers", Value::Null)).await;
        assert_eq!(response.error.as_deref(), Some("fetch failed"));
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn set_print_params_echoes_the_new_size() {
        let (services, _) = services(ScriptedRunner::new());

        let response = dispatch(
            &services,
            request(4, "set-print-params", json!({"width": 800, "height": 600})),
        )
        .await;
        let size = response.result.expect("result");
        assert_eq!(size["width"], 800);
        assert_eq!(size["height"], 600);
    }

    #[tokio::test]
    async fn silent_print_qrcode_reports_the_target_printer() {
        let (services, host) = services(
            ScriptedRunner::new().on("Default=TRUE", Ok("HP-Office\r\n".into())),
        );

        let response = dispatch(
            &services,
            request(5, "silent-print-qrcode", json!({"content": "ORDER123"})),
        )
        .await;
        assert_eq!(response.result, Some(json!("HP-Office")));

        let state = host.state.lock().expect("state");
        assert_eq!(state.printed.len(), 1);
        assert!(state.printed[0].print_background, "qr keeps the background");
    }

    #[tokio::test]
    async fn silent_print_barcode_without_printers_maps_the_error() {
        let (services, host) = services(ScriptedRunner::new());

        let response = dispatch(
            &services,
            request(6, "silent-print-barcode", json!({"content": "ORDER123"})),
        )
        .await;
        assert_eq!(response.error.as_deref(), Some("no default printer found"));
        assert_eq!(host.state.lock().expect("state").created, 0);
    }

    #[tokio::test]
    async fn explicit_printer_and_background_override_pass_through() {
        let (services, host) = services(ScriptedRunner::new());

        let response = dispatch(
            &services,
            request(
                7,
                "silent-print-barcode",
                json!({
                    "content": "ORDER123",
                    "printerName": "Canon-Label",
                    "printBackground": true
                }),
            ),
        )
        .await;
        assert_eq!(response.result, Some(json!("Canon-Label")));

        let state = host.state.lock().expect("state");
        assert!(state.printed[0].print_background, "override wins over the kind default");
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let (services, _) = services(ScriptedRunner::new());

        let response = dispatch(&services, request(8, "reboot-printer", Value::Null)).await;
        assert_eq!(response.error.as_deref(), Some("unknown method: reboot-printer"));
    }

    #[tokio::test]
    async fn missing_required_params_are_rejected() {
        let (services, _) = services(ScriptedRunner::new());

        let response = dispatch(
            &services,
            request(9, "silent-print-qrcode", json!({})),
        )
        .await;
        let error = response.error.expect("error");
        assert!(error.starts_with("invalid params:"), "{error}");
    }
}
