pub mod campaigns;
pub mod dashboard;
pub mod events;
pub mod products;
pub mod report;
pub mod samples;
pub mod types;
pub mod uploads;

pub use self::campaigns::CampaignsService;
pub use self::dashboard::DashboardService;
pub use self::events::EventsService;
pub use self::products::ProductsService;
pub use self::samples::SamplesService;
pub use self::uploads::UploadsService;

use std::sync::Arc;

use failure::Error as FailureError;
use futures_cpupool::CpuPool;
use rusqlite::Connection;

use self::types::ServiceFuture;
use config::Config;
use repos::Database;
use storage::FileStorage;

/// Everything the operations need. Cheap to clone, one copy per request.
#[derive(Clone)]
pub struct Service {
    pub config: Config,
    pub db: Database,
    pub cpu_pool: CpuPool,
    pub storage: Arc<FileStorage>,
}

impl Service {
    pub fn new(config: Config, db: Database, cpu_pool: CpuPool, storage: Arc<FileStorage>) -> Self {
        Self {
            config,
            db,
            cpu_pool,
            storage,
        }
    }

    /// Runs blocking database work on the cpu pool with a fresh connection
    pub fn spawn_on_pool<T, F>(&self, f: F) -> ServiceFuture<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, FailureError> + Send + 'static,
    {
        let db = self.db.clone();
        Box::new(self.cpu_pool.spawn_fn(move || {
            let mut conn = db.connect()?;
            f(&mut conn)
        }))
    }
}

#[cfg(test)]
pub mod tests {
    use futures::Future;
    use tempfile::TempDir;

    use super::*;
    use config::{Dashboard, Database as DatabaseConfig, Storage as StorageConfig};
    use storage::LocalFileStorage;

    /// Service over a fresh database and upload folder inside `dir`
    pub fn create_service(dir: &TempDir) -> Service {
        let config = Config {
            listen: "127.0.0.1:0".parse().unwrap(),
            thread_count: 2,
            database: DatabaseConfig {
                path: dir.path().join("atelier.sqlite3").to_string_lossy().into_owned(),
                busy_timeout_ms: 1000,
            },
            storage: StorageConfig {
                uploads_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
                public_prefix: "/uploads".to_string(),
                max_upload_bytes: 1024 * 1024,
            },
            dashboard: Dashboard::default(),
        };
        let db = Database::new(config.database_path(), config.busy_timeout());
        db.prepare().unwrap();
        let storage = Arc::new(LocalFileStorage::new(&config.storage.uploads_dir, &config.storage.public_prefix));
        Service::new(config, db, CpuPool::new(2), storage)
    }

    #[test]
    fn pool_work_sees_migrated_schema() {
        let dir = TempDir::new().unwrap();
        let service = create_service(&dir);
        let version = service
            .spawn_on_pool(|conn| ::repos::schema::schema_version(conn))
            .wait()
            .unwrap();
        assert!(version > 0);
    }
}
