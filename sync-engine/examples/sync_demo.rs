//! Runs a full sync against an in-memory object store.
//!
//! ```bash
//! cargo run --example sync_demo -p sync-engine
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use store_traits::{ObjectMetadata, ObjectStore, PutRequest, StoreError};
use sync_engine::{ExistingRemoteFiles, SyncConfig, SyncCoordinator};

#[derive(Default)]
struct MemoryStore {
    objects: tokio::sync::Mutex<BTreeMap<String, (Bytes, ObjectMetadata)>>,
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, _bucket: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.objects.lock().await.keys().cloned().collect())
    }

    async fn get(&self, _bucket: &str, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.objects.lock().await.get(key).map(|(body, _)| body.clone()))
    }

    async fn put(&self, _bucket: &str, request: PutRequest) -> Result<(), StoreError> {
        println!(
            "  put {} ({} bytes, type={})",
            request.key,
            request.body.len(),
            request.metadata.content_type.as_deref().unwrap_or("-"),
        );
        self.objects
            .lock()
            .await
            .insert(request.key, (request.body, request.metadata));
        Ok(())
    }

    async fn delete(&self, _bucket: &str, key: &str) -> Result<(), StoreError> {
        println!("  delete {}", key);
        self.objects.lock().await.remove(key);
        Ok(())
    }

    async fn bucket_exists(&self, _bucket: &str) -> Result<bool, StoreError> {
        Ok(true)
    }
}

fn write(root: &PathBuf, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, body).unwrap();
}

#[tokio::main]
async fn main() {
    let root = std::env::temp_dir().join("sync-demo-assets");
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();

    write(&root, "index.html", "<html></html>");
    write(&root, "css/app-0123456789abcdef0123456789abcdef.css", "body { }");
    write(&root, "js/app.js", "console.log('hi');");

    let config = Arc::new(
        SyncConfig::builder()
            .asset_root(&root)
            .bucket("demo-bucket")
            .prefix("assets")
            .existing_remote_files(ExistingRemoteFiles::Compare)
            .build()
            .unwrap(),
    );
    let store = Arc::new(MemoryStore::default());

    println!("First sync:");
    let report = SyncCoordinator::new(config.clone(), store.clone())
        .sync()
        .await
        .unwrap();
    println!(
        "  -> uploaded {} object(s), deleted {}\n",
        report.uploaded.len(),
        report.deleted.len()
    );

    println!("Second sync (no local changes):");
    let report = SyncCoordinator::new(config, store).sync().await.unwrap();
    println!(
        "  -> uploaded {} object(s), deleted {}",
        report.uploaded.len(),
        report.deleted.len()
    );

    let _ = std::fs::remove_dir_all(&root);
}
