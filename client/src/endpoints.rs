use crate::error::ClientError;
use crate::gateway::Client;
use dossier_protocol::envelope::Page;
use dossier_protocol::envelope::Paginated;
use dossier_protocol::records::CaseFileDetail;
use dossier_protocol::records::CaseFileQuery;
use dossier_protocol::records::CaseFileSummary;
use dossier_protocol::records::ImportTask;
use dossier_protocol::records::SearchHit;
use dossier_protocol::records::SearchMeta;
use dossier_protocol::records::SearchQuery;

/// Search hits with the typed diagnostics split out of the envelope's meta
/// block.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub page: Option<Page>,
    pub meta: SearchMeta,
}

impl Client {
    /// Recent import batches, in the order the server returns them.
    pub async fn list_import_tasks(&self) -> Result<Vec<ImportTask>, ClientError> {
        self.get_data("case-file/import-tasks").await
    }

    pub async fn list_case_files(
        &self,
        query: &CaseFileQuery,
    ) -> Result<Paginated<CaseFileSummary>, ClientError> {
        self.get_paginated("case-file/list", query).await
    }

    pub async fn case_file_detail(&self, id: u64) -> Result<CaseFileDetail, ClientError> {
        self.get_data(&format!("case-file/detail/{id}")).await
    }

    pub async fn search_case_files(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResults, ClientError> {
        let page = self
            .post_paginated::<SearchHit, _>("case-file/search", query)
            .await?;
        let meta = page
            .meta
            .and_then(|meta| serde_json::from_value(meta).ok())
            .unwrap_or_default();
        Ok(SearchResults {
            hits: page.items,
            page: page.page,
            meta,
        })
    }

    pub async fn delete_case_file(&self, id: u64) -> Result<(), ClientError> {
        self.delete_ok(&format!("case-file/{id}")).await
    }
}
