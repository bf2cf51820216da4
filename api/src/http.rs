//! JSON sheet endpoint.
//!
//! Protocol, per worksheet at `{endpoint}/{worksheet}`:
//! - `GET` returns a [`Table`] as JSON (`{"columns": [...], "rows": [[...]]}`); `404` means
//!   the worksheet does not exist.
//! - `PUT` replaces the worksheet with the JSON table in the body.
//! - `POST` appends one row: `{"columns": [...], "row": [...]}`.
//!
//! Requests are blocking. Callers on an async runtime must hop onto a blocking
//! thread first.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;

use crate::{SheetConnection, SheetError, Table};

#[derive(Debug, Clone)]
pub struct HttpSheets {
    endpoint: String,
    token: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AppendRequest<'a> {
    columns: &'a [&'a str],
    row: &'a [String],
}

impl HttpSheets {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SheetError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(SheetError::Unavailable("no sheet endpoint configured".into()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            token,
            client,
        })
    }

    pub fn url_for(&self, worksheet: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), worksheet)
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl SheetConnection for HttpSheets {
    fn read(&self, worksheet: &str) -> Result<Table, SheetError> {
        let response = self
            .authorize(self.client.get(self.url_for(worksheet)))
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SheetError::MissingWorksheet(worksheet.to_string()));
        }
        Ok(response.error_for_status()?.json::<Table>()?)
    }

    fn update(&self, worksheet: &str, table: &Table) -> Result<(), SheetError> {
        self.authorize(self.client.put(self.url_for(worksheet)))
            .json(table)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn append(&self, worksheet: &str, header: &[&str], row: &[String]) -> Result<(), SheetError> {
        let body = AppendRequest {
            columns: header,
            row,
        };
        self.authorize(self.client.post(self.url_for(worksheet)))
            .json(&body)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("http:{}", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let sheets =
            HttpSheets::new("https://sheets.example/api/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            sheets.url_for("Reactions"),
            "https://sheets.example/api/Reactions"
        );
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let err = HttpSheets::new("  ", None, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SheetError::Unavailable(_)));
    }

    #[test]
    fn append_body_shape() {
        let row = vec!["1".to_string(), "0.5".to_string()];
        let body = AppendRequest {
            columns: &["ID", "Time"],
            row: &row,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"columns": ["ID", "Time"], "row": ["1", "0.5"]})
        );
    }
}
