use crate::client::ApiClient;
use crate::envelope::Page;
use crate::error::Error;
use crate::types::{LogEntry, LogQuery};

impl ApiClient {
    /// One page of the activity log. Filtering and paging happen server-side;
    /// totals are resolved from whichever pagination shape the backend sent.
    pub async fn list_logs(&self, query: &LogQuery) -> Result<Page<LogEntry>, Error> {
        self.get_page("logs", &query.params(), query.limit.max(1))
            .await
    }
}
