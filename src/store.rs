//! Read-only access to the client minimap database

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};
use crate::tile::TileRecord;

const SELECT_PIECES: &str = "SELECT position, data FROM mappiece";
const COUNT_PIECES: &str = "SELECT COUNT(*) FROM mappiece";

/// An open minimap database
pub struct TileStore {
    conn: Connection,
}

impl TileStore {
    /// Open an existing database without write access
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Store(format!("database not found: {}", path.display())));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "opened tile store");
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self.conn.query_row(COUNT_PIECES, [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Every stored map piece, in whatever order the database yields them
    pub fn load(&self) -> Result<Vec<TileRecord>> {
        let mut stmt = self.conn.prepare(SELECT_PIECES)?;
        let rows = stmt.query_map([], |row| Ok(TileRecord::new(row.get(0)?, row.get(1)?)))?;
        let tiles = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store(rows: &[(i64, &[u8])]) -> TileStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE mappiece (position INTEGER PRIMARY KEY, data BLOB)", [])
            .unwrap();
        for (pos, data) in rows {
            conn.execute("INSERT INTO mappiece VALUES (?1, ?2)", rusqlite::params![pos, data])
                .unwrap();
        }
        TileStore::from_connection(conn)
    }

    #[test]
    fn test_load_rows() {
        let store = memory_store(&[(5, &[0x0A, 0x00][..]), (1 << 27, &[1, 2, 3][..])]);
        assert_eq!(store.count().unwrap(), 2);

        let mut tiles = store.load().unwrap();
        tiles.sort_by_key(|t| t.packed_position);
        assert_eq!(tiles[0], TileRecord::new(5, vec![0x0A, 0x00]));
        assert_eq!(tiles[1].payload, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_table() {
        let store = TileStore::from_connection(Connection::open_in_memory().unwrap());
        assert!(matches!(store.load(), Err(Error::Store(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TileStore::open(dir.path().join("absent.db")),
            Err(Error::Store(_))
        ));
    }
}
