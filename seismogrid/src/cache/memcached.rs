//! Memcached cache backend.
//!
//! Speaks the memcached text protocol over a single TCP connection:
//! `set <key> <flags> <exptime> <bytes>` / `get <key>` / `flush_all`.
//! Values transit as raw bytes; callers serialize them.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tracing::info;

use super::r#trait::Cache;
use super::stats::CacheStats;
use super::types::{validate_key, CacheError, MemcachedConfig};

/// Network key/value store backend.
///
/// One connection, guarded by a mutex; requests from concurrent workers
/// serialize on it. Protocol surprises surface as
/// [`CacheError::Backend`].
pub struct MemcachedCache {
    connection: Mutex<BufReader<TcpStream>>,
    stats: Mutex<CacheStats>,
    address: String,
    default_ttl: Duration,
}

impl MemcachedCache {
    /// Connects to the configured server.
    pub fn connect(config: &MemcachedConfig) -> Result<Self, CacheError> {
        let mut last_error = None;
        for address in config.address.to_socket_addrs()? {
            match TcpStream::connect_timeout(&address, config.connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(config.io_timeout))?;
                    stream.set_write_timeout(Some(config.io_timeout))?;
                    stream.set_nodelay(true)?;
                    info!(address = %config.address, "connected to memcached");
                    return Ok(Self {
                        connection: Mutex::new(BufReader::new(stream)),
                        stats: Mutex::new(CacheStats::new()),
                        address: config.address.clone(),
                        default_ttl: config.default_ttl,
                    });
                }
                Err(error) => last_error = Some(error),
            }
        }

        Err(match last_error {
            Some(error) => CacheError::Io(error),
            None => CacheError::Backend(format!(
                "address {} resolves to nothing",
                config.address
            )),
        })
    }

    /// Server address this backend talks to.
    pub fn address(&self) -> &str {
        &self.address
    }

    fn store(&self, key: &str, value: &[u8], expire_secs: u64) -> Result<(), CacheError> {
        validate_key(key)?;
        let mut connection = lock(&self.connection);

        let header = format!("set {} 0 {} {}\r\n", key, expire_secs, value.len());
        let stream = connection.get_mut();
        stream.write_all(header.as_bytes())?;
        stream.write_all(value)?;
        stream.write_all(b"\r\n")?;

        let reply = read_line(&mut connection)?;
        if reply != "STORED" {
            return Err(CacheError::Backend(format!(
                "unexpected reply to set: {reply}"
            )));
        }

        lock(&self.stats).record_set();
        Ok(())
    }
}

impl Cache for MemcachedCache {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.store(key, value, self.default_ttl.as_secs())
    }

    fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.store(key, value, ttl.as_secs())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        validate_key(key)?;
        let mut connection = lock(&self.connection);

        let command = format!("get {}\r\n", key);
        connection.get_mut().write_all(command.as_bytes())?;

        let reply = read_line(&mut connection)?;
        if reply == "END" {
            lock(&self.stats).record_miss();
            return Ok(None);
        }

        let length = parse_value_header(&reply)?;
        // The data block is followed by its own CRLF.
        let mut data = vec![0u8; length + 2];
        connection.read_exact(&mut data)?;
        data.truncate(length);

        let terminator = read_line(&mut connection)?;
        if terminator != "END" {
            return Err(CacheError::Backend(format!(
                "unexpected reply after value block: {terminator}"
            )));
        }

        lock(&self.stats).record_hit();
        Ok(Some(data))
    }

    fn flush(&self) -> Result<(), CacheError> {
        let mut connection = lock(&self.connection);
        connection.get_mut().write_all(b"flush_all\r\n")?;

        let reply = read_line(&mut connection)?;
        if reply != "OK" {
            return Err(CacheError::Backend(format!(
                "unexpected reply to flush_all: {reply}"
            )));
        }

        lock(&self.stats).record_flush();
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        *lock(&self.stats)
    }

    fn backend(&self) -> &str {
        "memcached"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_line(connection: &mut BufReader<TcpStream>) -> Result<String, CacheError> {
    let mut line = String::new();
    if connection.read_line(&mut line)? == 0 {
        return Err(CacheError::Backend(
            "connection closed by server".to_string(),
        ));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

/// Parses `VALUE <key> <flags> <bytes>` and returns the byte count.
fn parse_value_header(line: &str) -> Result<usize, CacheError> {
    let mut fields = line.split(' ');
    if fields.next() != Some("VALUE") {
        return Err(CacheError::Backend(format!(
            "unexpected reply to get: {line}"
        )));
    }
    fields
        .nth(2)
        .and_then(|bytes| bytes.parse().ok())
        .ok_or_else(|| CacheError::Backend(format!("malformed value header: {line}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::TcpListener;
    use std::thread;

    // ========================================================================
    // Test helpers
    // ========================================================================

    /// Minimal in-process memcached speaking just enough protocol for
    /// one client connection.
    fn fake_server() -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut store: HashMap<String, Vec<u8>> = HashMap::new();

            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                let line = line.trim_end().to_string();
                let mut parts = line.split(' ');

                match parts.next() {
                    Some("set") => {
                        let key = parts.next().unwrap().to_string();
                        let _flags = parts.next().unwrap();
                        let _exptime = parts.next().unwrap();
                        let length: usize = parts.next().unwrap().parse().unwrap();

                        let mut data = vec![0u8; length + 2];
                        reader.read_exact(&mut data).unwrap();
                        data.truncate(length);
                        store.insert(key, data);
                        reader.get_mut().write_all(b"STORED\r\n").unwrap();
                    }
                    Some("get") => {
                        let key = parts.next().unwrap();
                        if let Some(value) = store.get(key) {
                            let header = format!("VALUE {} 0 {}\r\n", key, value.len());
                            reader.get_mut().write_all(header.as_bytes()).unwrap();
                            reader.get_mut().write_all(value).unwrap();
                            reader.get_mut().write_all(b"\r\n").unwrap();
                        }
                        reader.get_mut().write_all(b"END\r\n").unwrap();
                    }
                    Some("flush_all") => {
                        store.clear();
                        reader.get_mut().write_all(b"OK\r\n").unwrap();
                    }
                    _ => break,
                }
            }
        });

        (address, handle)
    }

    fn connect(address: &str) -> MemcachedCache {
        MemcachedCache::connect(&MemcachedConfig::new(address)).unwrap()
    }

    // ========================================================================
    // Tests
    // ========================================================================

    #[test]
    fn test_set_then_get_round_trips() {
        let (address, server) = fake_server();
        let cache = connect(&address);

        cache.set("curve:one", b"{\"0.1\":0.9}").unwrap();
        assert_eq!(
            cache.get("curve:one").unwrap(),
            Some(b"{\"0.1\":0.9}".to_vec())
        );

        drop(cache);
        server.join().unwrap();
    }

    #[test]
    fn test_get_absent_key_is_none() {
        let (address, server) = fake_server();
        let cache = connect(&address);

        assert_eq!(cache.get("missing").unwrap(), None);
        assert_eq!(cache.stats().misses, 1);

        drop(cache);
        server.join().unwrap();
    }

    #[test]
    fn test_binary_value_survives_framing() {
        let (address, server) = fake_server();
        let cache = connect(&address);

        let payload: Vec<u8> = (0u8..=255).collect();
        cache.set("blob", &payload).unwrap();
        assert_eq!(cache.get("blob").unwrap(), Some(payload));

        drop(cache);
        server.join().unwrap();
    }

    #[test]
    fn test_flush_clears_server_store() {
        let (address, server) = fake_server();
        let cache = connect(&address);

        cache.set("a", b"1").unwrap();
        cache.flush().unwrap();
        assert_eq!(cache.get("a").unwrap(), None);

        drop(cache);
        server.join().unwrap();
    }

    #[test]
    fn test_ttl_set_is_accepted() {
        let (address, server) = fake_server();
        let cache = connect(&address);

        cache
            .set_with_ttl("short", b"v", Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.get("short").unwrap(), Some(b"v".to_vec()));

        drop(cache);
        server.join().unwrap();
    }

    #[test]
    fn test_configured_ttl_applies_to_plain_set() {
        let (address, server) = fake_server();
        let config =
            MemcachedConfig::new(&address).with_default_ttl(Duration::from_secs(60));
        let cache = MemcachedCache::connect(&config).unwrap();

        cache.set("short", b"v").unwrap();
        assert_eq!(cache.get("short").unwrap(), Some(b"v".to_vec()));

        drop(cache);
        server.join().unwrap();
    }

    #[test]
    fn test_empty_key_fails_before_hitting_the_wire() {
        let (address, server) = fake_server();
        let cache = connect(&address);

        assert!(matches!(cache.set("", b"x"), Err(CacheError::EmptyKey)));
        assert!(matches!(cache.get(""), Err(CacheError::EmptyKey)));

        drop(cache);
        server.join().unwrap();
    }

    #[test]
    fn test_value_header_parsing() {
        assert_eq!(parse_value_header("VALUE k 0 17").unwrap(), 17);
        assert!(parse_value_header("ERROR").is_err());
        assert!(parse_value_header("VALUE k 0").is_err());
        assert!(parse_value_header("VALUE k 0 x").is_err());
    }
}
