// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print dispatch workflow.
//
// Resolve the target printer, build the markup document, create a hidden
// surface, load, print silently, and release the surface. Release happens on
// every outcome — the one genuine resource-lifetime contract in the system.

use std::path::PathBuf;

use tracing::{error, info};

use leisedruck_core::error::{LeisedruckError, Result};
use leisedruck_core::types::{PageSize, PrintRequest, RequestId};
use leisedruck_spooler::printers::PrinterDirectory;
use leisedruck_spooler::runner::QueryRunner;

use crate::document::PrintDocument;
use crate::params::PageSizeHolder;
use crate::surface::{MarginType, PrintOptions, RenderSurface, SurfaceHost};

/// Outcome summary of a successful dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub request_id: RequestId,
    /// The printer the job was sent to (resolved default or explicit target).
    pub printer_name: String,
    /// The geometry the dispatch actually used.
    pub page_size: PageSize,
}

/// Drives the silent-print workflow against a surface host.
pub struct PrintDispatcher<R, H> {
    printers: PrinterDirectory<R>,
    host: H,
    page_size: PageSizeHolder,
    /// Directory holding the bundled template pages.
    template_root: PathBuf,
}

impl<R: QueryRunner, H: SurfaceHost> PrintDispatcher<R, H> {
    pub fn new(
        printers: PrinterDirectory<R>,
        host: H,
        page_size: PageSizeHolder,
        template_root: PathBuf,
    ) -> Self {
        Self {
            printers,
            host,
            page_size,
            template_root,
        }
    }

    /// Dispatch one print request.
    ///
    /// Printer resolution happens before any surface is created, so a missing
    /// default printer never allocates a hidden window. The surface is
    /// released exactly once on success and on failure.
    pub async fn print_content(&self, request: &PrintRequest) -> Result<DispatchReport> {
        let printer_name = match &request.printer_name {
            Some(name) => name.clone(),
            None => self.printers.default_printer_name().await?,
        };

        let document = match &request.image_payload {
            Some(payload) => PrintDocument::inline_image(payload),
            None => PrintDocument::template(&self.template_root, request.kind, &request.content),
        };

        // Geometry is read here, not when the request was built: a config
        // update racing this dispatch wins (documented behavior).
        let options = PrintOptions {
            device_name: printer_name.clone(),
            silent: true,
            print_background: request.background(),
            page_size: self.page_size.get(),
            margins: MarginType::None,
        };

        let mut surface = self.host.create_surface()?;
        let outcome = Self::drive(&mut surface, &document, &options).await;
        surface.release();

        match outcome {
            Ok(()) => {
                info!(
                    request = %request.id,
                    printer = %printer_name,
                    kind = ?request.kind,
                    "silent print dispatched"
                );
                Ok(DispatchReport {
                    request_id: request.id,
                    printer_name,
                    page_size: options.page_size,
                })
            }
            Err(e) => {
                error!(request = %request.id, printer = %printer_name, error = %e, "silent print failed");
                Err(wrap_dispatch(e))
            }
        }
    }

    /// Load-then-print; split out so the caller releases on either failure.
    async fn drive(
        surface: &mut H::Surface,
        document: &PrintDocument,
        options: &PrintOptions,
    ) -> Result<()> {
        surface.load(document).await?;
        surface.print(options).await
    }
}

/// Propagate dispatch-shaped errors as-is, wrap everything else.
fn wrap_dispatch(err: LeisedruckError) -> LeisedruckError {
    match err {
        e @ (LeisedruckError::Dispatch(_)
        | LeisedruckError::SurfaceUnavailable
        | LeisedruckError::NoDefaultPrinter) => e,
        other => LeisedruckError::Dispatch(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use leisedruck_core::types::ContentKind;
    use leisedruck_spooler::testing::ScriptedRunner;

    #[derive(Debug, Default)]
    struct HostState {
        created: usize,
        released: usize,
        loaded: Vec<PrintDocument>,
        printed: Vec<PrintOptions>,
    }

    /// Host whose surfaces record every call and can be told to fail.
    #[derive(Clone, Default)]
    struct MockHost {
        state: Arc<Mutex<HostState>>,
        fail_load: bool,
        fail_print: bool,
    }

    impl MockHost {
        fn state(&self) -> HostState {
            std::mem::take(&mut *self.state.lock().expect("state lock"))
        }
    }

    struct MockSurface {
        state: Arc<Mutex<HostState>>,
        fail_load: bool,
        fail_print: bool,
    }

    impl SurfaceHost for MockHost {
        type Surface = MockSurface;

        fn create_surface(&self) -> Result<Self::Surface> {
            self.state.lock().expect("state lock").created += 1;
            Ok(MockSurface {
                state: Arc::clone(&self.state),
                fail_load: self.fail_load,
                fail_print: self.fail_print,
            })
        }
    }

    impl RenderSurface for MockSurface {
        async fn load(&mut self, document: &PrintDocument) -> Result<()> {
            if self.fail_load {
                return Err(LeisedruckError::Dispatch("load failed".into()));
            }
            self.state.lock().expect("state lock").loaded.push(document.clone());
            Ok(())
        }

        async fn print(&mut self, options: &PrintOptions) -> Result<()> {
            if self.fail_print {
                return Err(LeisedruckError::Dispatch("print failed".into()));
            }
            self.state.lock().expect("state lock").printed.push(options.clone());
            Ok(())
        }

        fn release(&mut self) {
            self.state.lock().expect("state lock").released += 1;
        }
    }

    const DEFAULT_PRINTER: &str = "HP-Office";

    fn dispatcher_with(
        runner: ScriptedRunner,
        host: MockHost,
        holder: PageSizeHolder,
    ) -> PrintDispatcher<ScriptedRunner, MockHost> {
        PrintDispatcher::new(
            PrinterDirectory::new(runner),
            host,
            holder,
            PathBuf::from("/opt/leisedruck/static"),
        )
    }

    fn runner_with_default() -> ScriptedRunner {
        ScriptedRunner::new().on("Default=TRUE", Ok(format!("{DEFAULT_PRINTER}\r\n")))
    }

    #[tokio::test]
    async fn successful_dispatch_releases_surface_once() {
        let host = MockHost::default();
        let dispatcher =
            dispatcher_with(runner_with_default(), host.clone(), PageSizeHolder::default());

        let request = PrintRequest::new(ContentKind::QrCode, "ORDER123");
        let report = dispatcher.print_content(&request).await.expect("dispatch");
        assert_eq!(report.printer_name, DEFAULT_PRINTER);

        let state = host.state();
        assert_eq!(state.created, 1);
        assert_eq!(state.released, 1);
        assert_eq!(state.printed.len(), 1);
    }

    #[tokio::test]
    async fn load_failure_still_releases_surface_once() {
        let host = MockHost {
            fail_load: true,
            ..MockHost::default()
        };
        let dispatcher =
            dispatcher_with(runner_with_default(), host.clone(), PageSizeHolder::default());

        let request = PrintRequest::new(ContentKind::QrCode, "ORDER123");
        let err = dispatcher.print_content(&request).await.unwrap_err();
        assert!(matches!(err, LeisedruckError::Dispatch(_)));

        let state = host.state();
        assert_eq!(state.created, 1);
        assert_eq!(state.released, 1, "release must happen on failure too");
        assert!(state.printed.is_empty());
    }

    #[tokio::test]
    async fn print_failure_still_releases_surface_once() {
        let host = MockHost {
            fail_print: true,
            ..MockHost::default()
        };
        let dispatcher =
            dispatcher_with(runner_with_default(), host.clone(), PageSizeHolder::default());

        let request = PrintRequest::new(ContentKind::Barcode, "ORDER123");
        let err = dispatcher.print_content(&request).await.unwrap_err();
        assert!(matches!(err, LeisedruckError::Dispatch(_)));

        let state = host.state();
        assert_eq!(state.released, 1);
    }

    #[tokio::test]
    async fn no_printers_fails_before_any_surface_exists() {
        let host = MockHost::default();
        // No scripted responses at all: every strategy and the listing are empty.
        let dispatcher =
            dispatcher_with(ScriptedRunner::new(), host.clone(), PageSizeHolder::default());

        let request = PrintRequest::new(ContentKind::Barcode, "ORDER123");
        let err = dispatcher.print_content(&request).await.unwrap_err();
        assert!(matches!(err, LeisedruckError::NoDefaultPrinter));

        let state = host.state();
        assert_eq!(state.created, 0, "no surface may be opened without a printer");
    }

    #[tokio::test]
    async fn explicit_printer_skips_default_resolution() {
        let host = MockHost::default();
        let runner = ScriptedRunner::new();
        let dispatcher = dispatcher_with(runner.clone(), host.clone(), PageSizeHolder::default());

        let request =
            PrintRequest::new(ContentKind::QrCode, "ORDER123").with_printer("Canon-Label");
        let report = dispatcher.print_content(&request).await.expect("dispatch");
        assert_eq!(report.printer_name, "Canon-Label");
        assert!(runner.calls().is_empty(), "no shell query for an explicit target");
    }

    #[tokio::test]
    async fn options_carry_silent_zero_margins_and_kind_background() {
        let host = MockHost::default();
        let dispatcher =
            dispatcher_with(runner_with_default(), host.clone(), PageSizeHolder::default());

        let request = PrintRequest::new(ContentKind::Barcode, "ORDER123");
        dispatcher.print_content(&request).await.expect("dispatch");

        let state = host.state();
        let options = &state.printed[0];
        assert!(options.silent);
        assert_eq!(options.margins, MarginType::None);
        assert!(!options.print_background, "barcode defaults to no background");
        assert_eq!(options.page_size, PageSize::DEFAULT);
    }

    #[tokio::test]
    async fn page_size_is_read_at_dispatch_time() {
        let host = MockHost::default();
        let holder = PageSizeHolder::default();
        let dispatcher = dispatcher_with(runner_with_default(), host.clone(), holder.clone());

        // Request built first, config updated afterwards: the update wins.
        let request = PrintRequest::new(ContentKind::QrCode, "ORDER123");
        holder.set(PageSize {
            width: 800,
            height: 600,
        });

        let report = dispatcher.print_content(&request).await.expect("dispatch");
        assert_eq!(report.page_size.width, 800);

        let state = host.state();
        assert_eq!(state.printed[0].page_size.height, 600);
    }

    #[tokio::test]
    async fn image_payload_uses_inline_document() {
        let host = MockHost::default();
        let dispatcher =
            dispatcher_with(runner_with_default(), host.clone(), PageSizeHolder::default());

        let request = PrintRequest::new(ContentKind::QrCode, "ORDER123")
            .with_image_payload("data:image/png;base64,AAAA");
        dispatcher.print_content(&request).await.expect("dispatch");

        let state = host.state();
        match &state.loaded[0] {
            PrintDocument::InlineHtml(html) => assert!(html.contains("base64,AAAA")),
            other => panic!("expected inline document, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn text_content_routes_through_the_template_page() {
        let host = MockHost::default();
        let dispatcher =
            dispatcher_with(runner_with_default(), host.clone(), PageSizeHolder::default());

        let request = PrintRequest::new(ContentKind::QrCode, "ORDER 123");
        dispatcher.print_content(&request).await.expect("dispatch");

        let state = host.state();
        match &state.loaded[0] {
            PrintDocument::TemplateUrl(url) => {
                assert!(url.contains("qrCode.html?content=ORDER%20123"));
            }
            other => panic!("expected template URL, got {other:?}"),
        }
    }
}
