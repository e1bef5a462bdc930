//! graphdoc command line tool.
//!
//! Provides the `graphdoc` binary with subcommands for working with a
//! SQLite-backed graph store: save, load, update and delete graphs, and
//! list what is stored. Graph data is read and written as N-Triples lines,
//! matching the on-disk adaptor, so files roundtrip byte-compatibly.
//!
//! The statement index is in-memory and rebuilt from the stored documents
//! at startup; it exists to keep every CLI operation running the same
//! consistency protocol as an embedded store.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use graphdoc_core::graph::Graph;
use graphdoc_core::name::GraphName;
use graphdoc_core::triple::Triple;
use graphdoc_store::document::{Access, DocumentGuard};
use graphdoc_store::error::StoreError;
use graphdoc_store::index::MemoryIndex;
use graphdoc_store::manager::{DocumentManager, StoreManager};
use graphdoc_store::ntriples::{self, LineAdaptor};
use graphdoc_store::sqlite::{SqliteDocumentStore, SqliteRegistry};
use graphdoc_store::traits::{DataAdaptor, DocumentStore, GraphRegistry, TripleIndex};

type Manager = StoreManager<SqliteDocumentStore, LineAdaptor, SqliteRegistry, MemoryIndex>;

/// graphdoc graph store tools.
#[derive(Parser)]
#[command(name = "graphdoc", about = "Document-backed RDF graph store tools")]
struct Cli {
    /// Path to the store database file.
    #[arg(short, long, default_value = "graphdoc.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Save a graph from an N-Triples file, replacing any prior version.
    Save {
        /// Graph IRI (empty for the default graph).
        graph: String,
        /// N-Triples file to read.
        file: PathBuf,
    },
    /// Print a graph's statements as N-Triples.
    Load {
        /// Graph IRI (empty for the default graph).
        graph: String,
    },
    /// Apply incremental additions and/or removals to a graph.
    Update {
        /// Graph IRI (empty for the default graph).
        graph: String,
        /// N-Triples file of statements to add.
        #[arg(long)]
        add: Option<PathBuf>,
        /// N-Triples file of statements to remove.
        #[arg(long)]
        remove: Option<PathBuf>,
    },
    /// Delete a graph and its index entries.
    Delete {
        /// Graph IRI (empty for the default graph).
        graph: String,
    },
    /// List stored graphs.
    List,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            1
        }
    };
    process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<(), StoreError> {
    let mut manager = open_manager(&cli.db)?;
    let result = match &cli.command {
        Commands::Save { graph, file } => {
            let name = GraphName::named(graph);
            let mut g = Graph::new(name);
            g.assert_all(read_triples(file)?);
            manager.save_graph(&g)
        }
        Commands::Load { graph } => {
            let name = GraphName::named(graph);
            let mut g = Graph::new(name.clone());
            manager.load_graph(&name, &mut g)?;
            print!("{}", ntriples::format_document(&g.to_vec()));
            Ok(())
        }
        Commands::Update { graph, add, remove } => {
            let name = GraphName::named(graph);
            let additions = add.as_deref().map(read_triples).transpose()?;
            let removals = remove.as_deref().map(read_triples).transpose()?;
            manager.update_graph(&name, additions.as_deref(), removals.as_deref())
        }
        Commands::Delete { graph } => manager.delete_graph(&GraphName::named(graph)),
        Commands::List => {
            for name in manager.registry().graphs()? {
                println!("{}", name);
            }
            Ok(())
        }
    };
    result?;
    manager.close()
}

/// Opens the SQLite-backed store and rebuilds the in-memory index from the
/// stored documents.
fn open_manager(db: &str) -> Result<Manager, StoreError> {
    let mut store = SqliteDocumentStore::open(db)?;
    let registry = SqliteRegistry::open(db)?;
    let adaptor = LineAdaptor::new();
    let mut index = MemoryIndex::new();

    for name in registry.graphs()? {
        let doc_name = registry.document_name(&name);
        if !store.has_document(&doc_name) {
            continue;
        }
        let mut graph = Graph::new(name);
        let guard = DocumentGuard::open(&mut store, &doc_name, Access::Read)?;
        let decoded = adaptor.to_graph(guard.document(), &mut graph);
        drop(guard);
        decoded?;
        index.add_to_index(&graph.to_vec())?;
    }
    tracing::debug!(triples = index.len(), "index rebuilt from store");

    Ok(StoreManager::new(
        DocumentManager::new(store, adaptor, registry),
        index,
    ))
}

/// Reads an N-Triples file into a statement list.
fn read_triples(path: &std::path::Path) -> Result<Vec<Triple>, StoreError> {
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::MalformedDocument {
        reason: format!("cannot read '{}': {}", path.display(), e),
    })?;
    ntriples::parse_document(&text)
}
