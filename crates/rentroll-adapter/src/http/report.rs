/*
[INPUT]:  Report name, business id, date range, export settings
[OUTPUT]: Report URLs, rendered report content, CSV/PDF downloads
[POS]:    HTTP layer - /wsvc report service
[UPDATE]: When report query parameters change
*/

use reqwest::{Method, Url};
use tracing::info;

use crate::http::{RentrollClient, Result};
use crate::types::{ReportExport, ReportRequest, format_wire_date};

impl RentrollClient {
    /// URL of a report view
    ///
    /// /wsvc/{BID}?r={report}&dtstart={start}&dtstop={stop}
    pub fn report_url(&self, request: &ReportRequest) -> Result<Url> {
        let mut url = self.url(&format!("wsvc/{}", request.bid))?;
        url.query_pairs_mut()
            .append_pair("r", &request.report)
            .append_pair("dtstart", &format_wire_date(request.start))
            .append_pair("dtstop", &format_wire_date(request.stop));
        Ok(url)
    }

    /// URL of a CSV or PDF export of a report
    pub fn export_url(&self, request: &ReportRequest, export: &ReportExport) -> Result<Url> {
        let mut url = self.report_url(request)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("rtype", export.format().rtype());
            if let ReportExport::Pdf(page) = export {
                query
                    .append_pair("pw", &page.width.normalize().to_string())
                    .append_pair("ph", &page.height.normalize().to_string());
            }
        }
        Ok(url)
    }

    /// Load the rendered report into memory
    pub async fn fetch_report(&self, request: &ReportRequest) -> Result<String> {
        let url = self.report_url(request)?;
        let builder = self.request(Method::GET, url);
        self.send_text(builder).await
    }

    /// Download an export of the report
    pub async fn export_report(
        &self,
        request: &ReportRequest,
        export: &ReportExport,
    ) -> Result<Vec<u8>> {
        let url = self.export_url(request, export)?;
        let builder = self.request(Method::GET, url);
        let bytes = self.send_bytes(builder).await?;
        info!(
            report = %request.report,
            format = %export.format(),
            size = bytes.len(),
            "report exported"
        );
        Ok(bytes)
    }
}
