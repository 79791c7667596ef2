// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend services bundle.
//
// One struct owning the printer directory, the job directory, the dispatcher,
// and the in-memory page-size store, wired once at startup and shared by the
// command surface and the bus listener.

use std::path::PathBuf;

use tracing::info;

use leisedruck_core::config::AppConfig;
use leisedruck_core::error::Result;
use leisedruck_core::types::{ContentKind, PageSize, PrintRequest, PrinterInfo, SpoolerJob};
use leisedruck_dispatch::dispatcher::{DispatchReport, PrintDispatcher};
use leisedruck_dispatch::params::PageSizeHolder;
use leisedruck_dispatch::surface::SurfaceHost;
use leisedruck_spooler::jobs::JobDirectory;
use leisedruck_spooler::printers::PrinterDirectory;
use leisedruck_spooler::runner::QueryRunner;

/// Everything the command surface needs, behind one handle.
pub struct BridgeServices<R, H> {
    printers: PrinterDirectory<R>,
    jobs: JobDirectory<R>,
    dispatcher: PrintDispatcher<R, H>,
    page_size: PageSizeHolder,
}

impl<R: QueryRunner + Clone, H: SurfaceHost> BridgeServices<R, H> {
    pub fn new(runner: R, host: H, config: &AppConfig, template_root: PathBuf) -> Self {
        let page_size = PageSizeHolder::new(config.default_page_size);
        Self {
            printers: PrinterDirectory::new(runner.clone()),
            jobs: JobDirectory::new(runner.clone()),
            dispatcher: PrintDispatcher::new(
                PrinterDirectory::new(runner),
                host,
                page_size.clone(),
                template_root,
            ),
            page_size,
        }
    }

    pub async fn get_printers(&self) -> Result<Vec<PrinterInfo>> {
        self.printers.list_printers().await
    }

    pub async fn get_print_jobs(&self, printer_name: Option<&str>) -> Result<Vec<SpoolerJob>> {
        self.jobs.list_jobs(printer_name).await
    }

    /// Update the page geometry used by subsequent dispatches. Takes effect
    /// immediately; in-flight dispatches read the store at dispatch time.
    pub fn set_print_params(&self, size: PageSize) -> PageSize {
        self.page_size.set(size);
        info!(width = size.width, height = size.height, "print page size updated");
        size
    }

    pub async fn silent_print(&self, request: PrintRequest) -> Result<DispatchReport> {
        self.dispatcher.print_content(&request).await
    }

    pub async fn silent_print_qrcode(&self, request: PrintRequest) -> Result<DispatchReport> {
        debug_assert_eq!(request.kind, ContentKind::QrCode);
        self.silent_print(request).await
    }

    pub async fn silent_print_barcode(&self, request: PrintRequest) -> Result<DispatchReport> {
        debug_assert_eq!(request.kind, ContentKind::Barcode);
        self.silent_print(request).await
    }
}
