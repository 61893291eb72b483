//! Dashboard state: the ordered set of cities currently shown.
//!
//! The collection only changes after a fetch resolves successfully or on an
//! explicit removal. Rejected operations leave it untouched.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    DashboardError, FetchError, WeatherProvider, WeatherRecord, config::DEFAULT_CITY,
};

/// Lifecycle of the dashboard as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the default city to be seeded.
    Loading,
    /// Interactive. The collection may still be empty if seeding failed.
    Ready,
}

#[derive(Debug)]
pub struct Dashboard<P> {
    provider: P,
    default_city: String,
    records: Vec<WeatherRecord>,
    selected: Option<u64>,
    phase: Phase,
    busy: watch::Sender<bool>,
}

/// Holds the busy flag up for as long as it lives, including when the
/// owning future is dropped mid-fetch.
struct BusyGuard<'a>(&'a watch::Sender<bool>);

impl<'a> BusyGuard<'a> {
    fn enter(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

/// Moves the dashboard to [`Phase::Ready`] when dropped, so a cancelled seed
/// leaves it interactive and empty rather than stuck loading.
struct ReadyOnDrop<'a>(&'a mut Phase);

impl<'a> ReadyOnDrop<'a> {
    fn enter(phase: &'a mut Phase) -> Self {
        *phase = Phase::Loading;
        Self(phase)
    }
}

impl Drop for ReadyOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = Phase::Ready;
    }
}

impl<P: WeatherProvider> Dashboard<P> {
    pub fn new(provider: P) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            provider,
            default_city: DEFAULT_CITY.to_string(),
            records: Vec::new(),
            selected: None,
            phase: Phase::Loading,
            busy,
        }
    }

    /// Override the city fetched by [`Dashboard::initialize`].
    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }

    /// Seed the dashboard with the default city.
    ///
    /// Whatever the outcome the dashboard ends up [`Phase::Ready`], including
    /// when this future is dropped mid-fetch; on failure the collection stays
    /// empty. Calling this on an already seeded dashboard does not fetch again.
    pub async fn initialize(&mut self) -> Result<&WeatherRecord, DashboardError> {
        if !self.records.is_empty() {
            self.phase = Phase::Ready;
            return Ok(&self.records[0]);
        }

        let result = {
            let _ready = ReadyOnDrop::enter(&mut self.phase);
            fetch_bracketed(&self.provider, &self.busy, &self.default_city).await
        };

        let record = result.inspect_err(|e| {
            warn!(city = %self.default_city, error = %e, "Failed to seed default city");
        })?;

        info!(id = record.id, name = %record.name, "Seeded default city");
        self.selected = Some(record.id);
        self.records.push(record);
        Ok(&self.records[0])
    }

    /// Fetch `name` and append it as the selected tab.
    pub async fn add_city(&mut self, name: &str) -> Result<&WeatherRecord, DashboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashboardError::EmptyCityName);
        }

        if let Some(existing) = self.records.iter().find(|r| r.has_name(name)) {
            info!(requested = name, existing = %existing.name, "Rejected duplicate city");
            return Err(DashboardError::DuplicateCity {
                name: existing.name.clone(),
            });
        }

        let record = fetch_bracketed(&self.provider, &self.busy, name)
            .await
            .inspect_err(|e| {
                warn!(city = name, error = %e, "Failed to add city");
            })?;

        // The provider may resolve a new spelling to a city already shown.
        if self
            .records
            .iter()
            .any(|r| r.id == record.id || r.has_name(&record.name))
        {
            info!(requested = name, resolved = %record.name, "Resolved city is already shown");
            return Err(DashboardError::DuplicateCity { name: record.name });
        }

        info!(id = record.id, name = %record.name, "Added city");
        let index = self.records.len();
        self.selected = Some(record.id);
        self.records.push(record);
        Ok(&self.records[index])
    }

    /// Remove the city with `id`. The last remaining city cannot be removed.
    pub fn remove_city(&mut self, id: u64) -> Result<WeatherRecord, DashboardError> {
        if self.records.len() == 1 {
            return Err(DashboardError::LastCityRemoval);
        }

        let index = self
            .position(id)
            .ok_or(DashboardError::UnknownCity { id })?;
        let removed = self.records.remove(index);

        if self.selected == Some(id) {
            self.selected = self
                .records
                .get(index)
                .or_else(|| self.records.last())
                .map(|r| r.id);
        }

        info!(id, name = %removed.name, "Removed city");
        Ok(removed)
    }

    /// Make the city with `id` the current tab.
    pub fn select(&mut self, id: u64) -> Result<&WeatherRecord, DashboardError> {
        let index = self
            .position(id)
            .ok_or(DashboardError::UnknownCity { id })?;
        self.selected = Some(id);
        Ok(&self.records[index])
    }

    pub fn selected(&self) -> Option<&WeatherRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: u64) -> Option<&WeatherRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Observe the busy flag, e.g. to drive a spinner while a fetch runs.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

/// Fetch `city` with the busy flag raised for the duration.
async fn fetch_bracketed<P: WeatherProvider>(
    provider: &P,
    busy: &watch::Sender<bool>,
    city: &str,
) -> Result<WeatherRecord, FetchError> {
    let _busy = BusyGuard::enter(busy);
    provider.fetch(city).await
}
