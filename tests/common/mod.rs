//! Common test fixtures shared across the integration test suite.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use unapi::{HttpResponse, MemoryReporter, Record, Transport, UnapiError};

/// PICA JSON record with title data and three copies in two libraries.
#[allow(dead_code)]
pub const PICA_RECORD: &str = r#"[
    ["001A", null, "0", "1999:15-06-23"],
    ["001B", null, "0", "1999:03-01-24", "t", "14:22:31.000"],
    ["003@", null, "0", "1234567890"],
    ["045R", null, "a", "ST 250"],
    ["045R", null, "a", "ST 270"],
    ["101@", null, "a", "24"],
    ["201A", "01", "0", "16-06-23"],
    ["201B", "01", "0", "20-06-23", "t", "08:15:00.000"],
    ["201D", "01", "0", "2024:16-06-23"],
    ["203@", "01", "0", "111111111"],
    ["209A", "01", "B", "DE-14", "a", "Bib 1"],
    ["101@", null, "a", "31"],
    ["201A", "01", "0", "17-06-23"],
    ["201B", "01", "0", "21-06-23", "t", "09:30:00.500"],
    ["201D", "01", "0", "2031:17-06-23"],
    ["203@", "01", "0", "222222222"],
    ["209A", "01", "B", "DE-15", "a", "Bib 2"],
    ["201A", "01", "0", "18-06-23"],
    ["201B", "01", "0", "22-06-23", "t", "10:45:10.000"],
    ["201D", "01", "0", "2024:18-06-23"],
    ["203@", "01", "0", "333333333"],
    ["209A", "01", "B", "DE-14", "a", "Bib 1"],
    ["209A", "02", "B", "DE-14", "a", "Bib 1"]
]"#;

/// MARC JSON record with control fields and three holdings.
#[allow(dead_code)]
pub const MARC_RECORD: &str = r#"[
    ["LDR", null, null, "_", "00000nam a2200000 c 4500"],
    ["001", null, null, "_", "1234567890"],
    ["005", null, null, "_", "20230615093000.0"],
    ["008", null, null, "_", "230615s2023    gw            000 0 ger d"],
    ["245", "1", "0", "a", "Titel"],
    ["924", "0", " ", "a", "111111111", "b", "DE-14"],
    ["924", "0", " ", "a", "222222222", "b", "DE-15"],
    ["924", "1", " ", "a", "333333333", "b", "DE-14"]
]"#;

/// Decode one of the fixtures.
#[allow(dead_code)]
pub fn record(json: &str) -> Record {
    Record::from_json_str(json).expect("fixture is a valid record")
}

/// A reporter and a shared handle for handing to an accessor.
#[allow(dead_code)]
pub fn reporter() -> (MemoryReporter, Arc<MemoryReporter>) {
    let reporter = MemoryReporter::new();
    let shared = Arc::new(reporter.clone());
    (reporter, shared)
}

/// Transport serving fixed pages and recording every requested URL.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct FakeTransport {
    pages: HashMap<String, (u16, String)>,
    requested: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeTransport {
    /// Serve `body` with `status` at `url`.
    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), (status, body.to_string()));
        self
    }

    /// URLs requested so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> unapi::Result<HttpResponse> {
        self.requested.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| UnapiError::Http(format!("no route to {url}")))?;
        Ok(HttpResponse {
            url: url.to_string(),
            status,
            body,
        })
    }
}

/// Format list served by the fake endpoint.
#[allow(dead_code)]
pub const FORMATS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<formats>
  <format name="picajson" type="application/json" docs="http://format.gbv.de/pica/json"/>
  <format name="marcjson" type="application/json" docs="http://format.gbv.de/marc/json"/>
  <format name="marcxml" type="application/xml" docs="http://www.loc.gov/standards/marcxml/"/>
  <format name="pp" type="text/plain"/>
</formats>"#;
