//! SQLite implementations of [`DocumentStore`] and [`GraphRegistry`].
//!
//! Documents are rows in the `documents` table, registrations rows in
//! `graphs`. Handle exclusivity is enforced in-process with the same
//! bookkeeping as the in-memory backend; SQLite itself serializes the
//! physical writes.
//!
//! The store and the registry each own their own connection so they can be
//! moved into the store manager independently; WAL mode keeps concurrent
//! connections to the same file safe.

use rusqlite::{params, Connection, OptionalExtension};

use graphdoc_core::name::GraphName;

use crate::document::{Access, Document, DocumentName, Holds};
use crate::error::StoreError;
use crate::registry::derive_document_name;
use crate::schema;
use crate::traits::{DocumentStore, GraphRegistry};

/// SQLite-backed document store.
pub struct SqliteDocumentStore {
    conn: Connection,
    holds: Holds,
    closed: bool,
}

impl SqliteDocumentStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(SqliteDocumentStore {
            conn: schema::open_database(path)?,
            holds: Holds::new(),
            closed: false,
        })
    }

    /// Opens an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(SqliteDocumentStore {
            conn: schema::open_in_memory()?,
            holds: Holds::new(),
            closed: false,
        })
    }

    fn fetch_body(&self, name: &DocumentName) -> Result<Option<Vec<u8>>, StoreError> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE name = ?1",
                params![name.0],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn has_document(&self, name: &DocumentName) -> bool {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM documents WHERE name = ?1)",
                params![name.0],
                |row| row.get(0),
            )
            .unwrap_or(false)
    }

    fn create_document(&mut self, name: &DocumentName) -> Result<(), StoreError> {
        if self.has_document(name) {
            return Err(StoreError::DocumentExists { name: name.clone() });
        }
        self.conn.execute(
            "INSERT INTO documents (name, body) VALUES (?1, X'')",
            params![name.0],
        )?;
        Ok(())
    }

    fn delete_document(&mut self, name: &DocumentName) -> Result<(), StoreError> {
        if self.holds.any_held(name) {
            return Err(StoreError::DocumentLocked { name: name.clone() });
        }
        let affected = self
            .conn
            .execute("DELETE FROM documents WHERE name = ?1", params![name.0])?;
        if affected == 0 {
            return Err(StoreError::DocumentMissing { name: name.clone() });
        }
        Ok(())
    }

    fn open(&mut self, name: &DocumentName, access: Access) -> Result<Document, StoreError> {
        let body = self
            .fetch_body(name)?
            .ok_or_else(|| StoreError::DocumentMissing { name: name.clone() })?;
        self.holds.acquire(name, access)?;
        Ok(Document::new(name.clone(), body))
    }

    fn put(&mut self, name: &DocumentName, doc: &Document) -> Result<(), StoreError> {
        self.holds.require_write(name)?;
        let affected = self.conn.execute(
            "UPDATE documents SET body = ?2 WHERE name = ?1",
            params![name.0, doc.body()],
        )?;
        if affected == 0 {
            return Err(StoreError::DocumentMissing { name: name.clone() });
        }
        Ok(())
    }

    fn release(&mut self, name: &DocumentName) {
        self.holds.release(name);
    }

    fn ready(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Fold the WAL back into the main database file.
        let _busy: i64 = self
            .conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |row| row.get(0))?;
        Ok(())
    }
}

/// SQLite-backed graph registry with hash-derived document names.
pub struct SqliteRegistry {
    conn: Connection,
}

impl SqliteRegistry {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(SqliteRegistry {
            conn: schema::open_database(path)?,
        })
    }

    /// Opens an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(SqliteRegistry {
            conn: schema::open_in_memory()?,
        })
    }
}

impl GraphRegistry for SqliteRegistry {
    fn document_name(&self, graph: &GraphName) -> DocumentName {
        derive_document_name(graph)
    }

    fn register(&mut self, graph: &GraphName, doc: &DocumentName) -> Result<(), StoreError> {
        if let Some(existing) = self.lookup(graph)? {
            if existing != *doc {
                return Err(StoreError::Registry {
                    reason: format!(
                        "graph '{}' already registered to document '{}'",
                        graph, existing
                    ),
                });
            }
            return Ok(());
        }
        self.conn.execute(
            "INSERT INTO graphs (graph_iri, document_name) VALUES (?1, ?2)",
            params![graph.safe_form(), doc.0],
        )?;
        Ok(())
    }

    fn unregister(&mut self, graph: &GraphName) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM graphs WHERE graph_iri = ?1",
            params![graph.safe_form()],
        )?;
        Ok(())
    }

    fn lookup(&self, graph: &GraphName) -> Result<Option<DocumentName>, StoreError> {
        let doc = self
            .conn
            .query_row(
                "SELECT document_name FROM graphs WHERE graph_iri = ?1",
                params![graph.safe_form()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(doc.map(DocumentName))
    }

    fn graphs(&self) -> Result<Vec<GraphName>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT graph_iri FROM graphs ORDER BY graph_iri")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(GraphName::from_safe_form(&row?));
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DocumentName {
        DocumentName(s.to_string())
    }

    #[test]
    fn document_crud_roundtrip() {
        let mut store = SqliteDocumentStore::in_memory().unwrap();
        let n = name("doc");

        assert!(!store.has_document(&n));
        store.create_document(&n).unwrap();
        assert!(store.has_document(&n));

        let mut doc = store.open(&n, Access::Write).unwrap();
        assert!(doc.body().is_empty());
        doc.set_body(b"payload".to_vec());
        store.put(&n, &doc).unwrap();
        store.release(&n);

        let doc = store.open(&n, Access::Read).unwrap();
        assert_eq!(doc.body(), b"payload");
        store.release(&n);

        store.delete_document(&n).unwrap();
        assert!(!store.has_document(&n));
    }

    #[test]
    fn create_existing_rejected() {
        let mut store = SqliteDocumentStore::in_memory().unwrap();
        let n = name("doc");
        store.create_document(&n).unwrap();
        assert!(matches!(
            store.create_document(&n),
            Err(StoreError::DocumentExists { .. })
        ));
    }

    #[test]
    fn held_document_cannot_be_deleted() {
        let mut store = SqliteDocumentStore::in_memory().unwrap();
        let n = name("doc");
        store.create_document(&n).unwrap();
        store.open(&n, Access::Read).unwrap();
        assert!(matches!(
            store.delete_document(&n),
            Err(StoreError::DocumentLocked { .. })
        ));
        store.release(&n);
        store.delete_document(&n).unwrap();
    }

    #[test]
    fn put_requires_write_hold() {
        let mut store = SqliteDocumentStore::in_memory().unwrap();
        let n = name("doc");
        store.create_document(&n).unwrap();
        let doc = store.open(&n, Access::Read).unwrap();
        assert!(matches!(
            store.put(&n, &doc),
            Err(StoreError::HandleNotHeld { .. })
        ));
    }

    #[test]
    fn registry_roundtrip() {
        let mut reg = SqliteRegistry::in_memory().unwrap();
        let g = GraphName::named("http://example.org/g");
        let doc = reg.document_name(&g);

        assert!(reg.lookup(&g).unwrap().is_none());
        reg.register(&g, &doc).unwrap();
        reg.register(&g, &doc).unwrap(); // idempotent
        assert_eq!(reg.lookup(&g).unwrap(), Some(doc));
        assert_eq!(reg.graphs().unwrap(), vec![g.clone()]);

        reg.unregister(&g).unwrap();
        assert!(reg.lookup(&g).unwrap().is_none());
        assert!(reg.graphs().unwrap().is_empty());
    }

    #[test]
    fn registry_handles_default_graph() {
        let mut reg = SqliteRegistry::in_memory().unwrap();
        let doc = reg.document_name(&GraphName::Default);
        reg.register(&GraphName::Default, &doc).unwrap();
        assert_eq!(reg.graphs().unwrap(), vec![GraphName::Default]);
    }

    #[test]
    fn persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let path = path.to_str().unwrap();

        {
            let mut store = SqliteDocumentStore::open(path).unwrap();
            let n = name("doc");
            store.create_document(&n).unwrap();
            let mut doc = store.open(&n, Access::Write).unwrap();
            doc.set_body(b"persisted".to_vec());
            store.put(&n, &doc).unwrap();
            store.release(&n);
            store.close().unwrap();
        }

        let mut store = SqliteDocumentStore::open(path).unwrap();
        let doc = store.open(&name("doc"), Access::Read).unwrap();
        assert_eq!(doc.body(), b"persisted");
    }
}
