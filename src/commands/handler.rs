//! Command Handler
//!
//! Turns an argument vector (`["SET", "key", "value"]`) into a call on the
//! [`StorageEngine`] and wraps the outcome in a [`Reply`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │  execute()  │───>│  dispatch() │───>│  cmd_xxx()  │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      StorageEngine          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each `cmd_xxx` validates arity and parses its arguments before it
//! touches the engine, and returns `Result<Reply>`. Errors become
//! [`Reply::Error`] carrying the error's token.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, trace};

use super::reply::Reply;
use crate::error::{Error, Result};
use crate::storage::{SetCondition, SetOptions, StorageEngine};

/// Dispatches commands to the storage engine.
#[derive(Clone)]
pub struct CommandHandler {
    /// The storage engine
    storage: Arc<StorageEngine>,
    /// Start time for INFO
    start_time: Instant,
}

// ============================================================================
// Argument helpers
// ============================================================================

fn exact(cmd: &str, args: &[Bytes], n: usize) -> Result<()> {
    if args.len() == n {
        Ok(())
    } else {
        Err(Error::WrongArity(cmd.to_string()))
    }
}

fn at_least(cmd: &str, args: &[Bytes], n: usize) -> Result<()> {
    if args.len() >= n {
        Ok(())
    } else {
        Err(Error::WrongArity(cmd.to_string()))
    }
}

/// Uppercased keyword for option matching.
fn keyword(arg: &[u8]) -> String {
    String::from_utf8_lossy(arg).to_ascii_uppercase()
}

fn parse_int(arg: &[u8]) -> Result<i64> {
    std::str::from_utf8(arg)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(Error::NotAnInteger)
}

fn parse_score(arg: &[u8]) -> Result<f64> {
    std::str::from_utf8(arg)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|score| !score.is_nan())
        .ok_or(Error::NotAFloat)
}

/// A positive TTL, scaled to milliseconds.
fn parse_ttl(cmd: &str, arg: &[u8], scale: i64) -> Result<i64> {
    let n = parse_int(arg)?;
    if n <= 0 {
        return Err(Error::InvalidExpireTime(cmd.to_string()));
    }
    n.checked_mul(scale)
        .ok_or_else(|| Error::InvalidExpireTime(cmd.to_string()))
}

/// Splits `[k1, v1, k2, v2, ...]` into pairs. Requires an even, non-zero count.
fn pairs(cmd: &str, args: &[Bytes]) -> Result<Vec<(Bytes, Bytes)>> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(Error::WrongArity(cmd.to_string()));
    }
    Ok(args
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}

impl CommandHandler {
    /// Creates a new command handler with the given storage engine.
    pub fn new(storage: Arc<StorageEngine>) -> Self {
        Self {
            storage,
            start_time: Instant::now(),
        }
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    /// Executes one command.
    ///
    /// `argv[0]` is the command name (case-insensitive); the rest are its
    /// arguments. Always produces a reply; failures come back as
    /// [`Reply::Error`].
    pub fn execute(&self, argv: &[Bytes]) -> Reply {
        let Some((name, args)) = argv.split_first() else {
            return Reply::error("ERR empty command");
        };

        let cmd = keyword(name);
        trace!(command = %cmd, args = args.len(), "Dispatching command");

        match self.dispatch(&cmd, args) {
            Ok(reply) => reply,
            Err(err) => {
                debug!(command = %cmd, kind = err.kind(), "Command failed");
                match err {
                    // echo the name as typed
                    Error::UnknownCommand(_) => Reply::from(Error::UnknownCommand(
                        String::from_utf8_lossy(name).into_owned(),
                    )),
                    err => Reply::from(err),
                }
            }
        }
    }

    /// Dispatches a command to its handler.
    fn dispatch(&self, cmd: &str, args: &[Bytes]) -> Result<Reply> {
        match cmd {
            // String commands
            "GET" => self.cmd_get(args),
            "SET" => self.cmd_set(args),
            "SETNX" => self.cmd_setnx(args),
            "SETEX" => self.cmd_setex(args, "setex", 1000),
            "PSETEX" => self.cmd_setex(args, "psetex", 1),
            "GETSET" => self.cmd_getset(args),
            "GETDEL" => self.cmd_getdel(args),
            "APPEND" => self.cmd_append(args),
            "STRLEN" => self.cmd_strlen(args),
            "INCR" => self.cmd_incr(args, "incr", Some(1)),
            "DECR" => self.cmd_incr(args, "decr", Some(-1)),
            "INCRBY" => self.cmd_incr(args, "incrby", None),
            "DECRBY" => self.cmd_decrby(args),
            "MGET" => self.cmd_mget(args),
            "MSET" => self.cmd_mset(args),

            // List commands
            "LPUSH" => self.cmd_push(args, "lpush", true),
            "RPUSH" => self.cmd_push(args, "rpush", false),
            "LPOP" => self.cmd_pop(args, "lpop", true),
            "RPOP" => self.cmd_pop(args, "rpop", false),
            "LLEN" => self.cmd_llen(args),
            "LINDEX" => self.cmd_lindex(args),
            "LRANGE" => self.cmd_lrange(args),
            "LSET" => self.cmd_lset(args),
            "LREM" => self.cmd_lrem(args),

            // Hash commands
            "HSET" => self.cmd_hset(args),
            "HGET" => self.cmd_hget(args),
            "HEXISTS" => self.cmd_hexists(args),
            "HDEL" => self.cmd_hdel(args),
            "HLEN" => self.cmd_hlen(args),
            "HGETALL" => self.cmd_hgetall(args),
            "HKEYS" => self.cmd_hkeys(args),
            "HVALS" => self.cmd_hvals(args),

            // Set commands
            "SADD" => self.cmd_sadd(args),
            "SREM" => self.cmd_srem(args),
            "SISMEMBER" => self.cmd_sismember(args),
            "SMEMBERS" => self.cmd_smembers(args),
            "SCARD" => self.cmd_scard(args),

            // Sorted set commands
            "ZADD" => self.cmd_zadd(args),
            "ZREM" => self.cmd_zrem(args),
            "ZSCORE" => self.cmd_zscore(args),
            "ZCARD" => self.cmd_zcard(args),
            "ZRANK" => self.cmd_zrank(args),
            "ZRANGE" => self.cmd_zrange(args),

            // Key commands
            "DEL" => self.cmd_del(args),
            "EXISTS" => self.cmd_exists(args),
            "EXPIRE" => self.cmd_expire(args, "expire", false),
            "PEXPIRE" => self.cmd_expire(args, "pexpire", true),
            "EXPIREAT" => self.cmd_expireat(args, "expireat", false),
            "PEXPIREAT" => self.cmd_expireat(args, "pexpireat", true),
            "TTL" => self.cmd_ttl(args, "ttl", false),
            "PTTL" => self.cmd_ttl(args, "pttl", true),
            "PERSIST" => self.cmd_persist(args),
            "KEYS" => self.cmd_keys(args),
            "TYPE" => self.cmd_type(args),
            "RENAME" => self.cmd_rename(args),
            "RENAMENX" => self.cmd_renamenx(args),

            // Server commands
            "PING" => self.cmd_ping(args),
            "ECHO" => self.cmd_echo(args),
            "DBSIZE" => self.cmd_dbsize(args),
            "FLUSHDB" | "FLUSHALL" => self.cmd_flushdb(args),
            "INFO" => self.cmd_info(args),

            _ => Err(Error::UnknownCommand(cmd.to_string())),
        }
    }

    // ========================================================================
    // String Commands
    // ========================================================================

    /// GET key
    fn cmd_get(&self, args: &[Bytes]) -> Result<Reply> {
        exact("get", args, 1)?;
        Ok(Reply::optional(self.storage.get(&args[0])?))
    }

    /// SET key value [EX seconds | PX milliseconds | KEEPTTL] [NX | XX] [GET]
    fn cmd_set(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("set", args, 2)?;

        let mut options = SetOptions::default();
        let mut get = false;

        let mut rest = args[2..].iter();
        while let Some(arg) = rest.next() {
            let opt = keyword(arg);
            match opt.as_str() {
                "EX" | "PX" => {
                    if options.ttl_millis.is_some() || options.keep_ttl {
                        return Err(Error::Syntax);
                    }
                    let value = rest.next().ok_or(Error::Syntax)?;
                    let scale = if opt == "EX" { 1000 } else { 1 };
                    options.ttl_millis = Some(parse_ttl("set", value, scale)?);
                }
                "KEEPTTL" => {
                    if options.ttl_millis.is_some() {
                        return Err(Error::Syntax);
                    }
                    options.keep_ttl = true;
                }
                "NX" | "XX" => {
                    if options.condition != SetCondition::Always {
                        return Err(Error::Syntax);
                    }
                    options.condition = if opt == "NX" {
                        SetCondition::IfAbsent
                    } else {
                        SetCondition::IfPresent
                    };
                }
                "GET" => get = true,
                _ => return Err(Error::Syntax),
            }
        }

        let outcome =
            self.storage
                .set_with_options(args[0].clone(), args[1].clone(), &options)?;

        Ok(if get {
            Reply::optional(outcome.previous)
        } else if outcome.written {
            Reply::ok()
        } else {
            Reply::Nil
        })
    }

    /// SETNX key value
    fn cmd_setnx(&self, args: &[Bytes]) -> Result<Reply> {
        exact("setnx", args, 2)?;
        let written = self.storage.setnx(args[0].clone(), args[1].clone())?;
        Ok(Reply::boolean(written))
    }

    /// SETEX key seconds value / PSETEX key milliseconds value
    fn cmd_setex(&self, args: &[Bytes], cmd: &str, scale: i64) -> Result<Reply> {
        exact(cmd, args, 3)?;
        let options = SetOptions {
            ttl_millis: Some(parse_ttl(cmd, &args[1], scale)?),
            ..SetOptions::default()
        };
        self.storage
            .set_with_options(args[0].clone(), args[2].clone(), &options)?;
        Ok(Reply::ok())
    }

    /// GETSET key value
    fn cmd_getset(&self, args: &[Bytes]) -> Result<Reply> {
        exact("getset", args, 2)?;
        let previous = self.storage.getset(args[0].clone(), args[1].clone())?;
        Ok(Reply::optional(previous))
    }

    /// GETDEL key
    fn cmd_getdel(&self, args: &[Bytes]) -> Result<Reply> {
        exact("getdel", args, 1)?;
        Ok(Reply::optional(self.storage.getdel(&args[0])?))
    }

    /// APPEND key value
    fn cmd_append(&self, args: &[Bytes]) -> Result<Reply> {
        exact("append", args, 2)?;
        let len = self.storage.append(args[0].clone(), &args[1])?;
        Ok(Reply::count(len))
    }

    /// STRLEN key
    fn cmd_strlen(&self, args: &[Bytes]) -> Result<Reply> {
        exact("strlen", args, 1)?;
        Ok(Reply::count(self.storage.strlen(&args[0])?))
    }

    /// INCR key / DECR key / INCRBY key increment
    fn cmd_incr(&self, args: &[Bytes], cmd: &str, fixed: Option<i64>) -> Result<Reply> {
        let delta = match fixed {
            Some(delta) => {
                exact(cmd, args, 1)?;
                delta
            }
            None => {
                exact(cmd, args, 2)?;
                parse_int(&args[1])?
            }
        };
        Ok(Reply::integer(self.storage.incr_by(args[0].clone(), delta)?))
    }

    /// DECRBY key decrement
    fn cmd_decrby(&self, args: &[Bytes]) -> Result<Reply> {
        exact("decrby", args, 2)?;
        let delta = parse_int(&args[1])?;
        Ok(Reply::integer(self.storage.decr_by(args[0].clone(), delta)?))
    }

    /// MGET key [key ...]
    fn cmd_mget(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("mget", args, 1)?;
        let values = self.storage.mget(args);
        Ok(Reply::array(values.into_iter().map(Reply::optional).collect()))
    }

    /// MSET key value [key value ...]
    fn cmd_mset(&self, args: &[Bytes]) -> Result<Reply> {
        self.storage.mset(pairs("mset", args)?)?;
        Ok(Reply::ok())
    }

    // ========================================================================
    // List Commands
    // ========================================================================

    /// LPUSH key value [value ...] / RPUSH key value [value ...]
    fn cmd_push(&self, args: &[Bytes], cmd: &str, head: bool) -> Result<Reply> {
        at_least(cmd, args, 2)?;
        let key = args[0].clone();
        let values = args[1..].to_vec();
        let len = if head {
            self.storage.lpush(key, values)?
        } else {
            self.storage.rpush(key, values)?
        };
        Ok(Reply::count(len))
    }

    /// LPOP key / RPOP key
    fn cmd_pop(&self, args: &[Bytes], cmd: &str, head: bool) -> Result<Reply> {
        exact(cmd, args, 1)?;
        let value = if head {
            self.storage.lpop(&args[0])?
        } else {
            self.storage.rpop(&args[0])?
        };
        Ok(Reply::optional(value))
    }

    /// LLEN key
    fn cmd_llen(&self, args: &[Bytes]) -> Result<Reply> {
        exact("llen", args, 1)?;
        Ok(Reply::count(self.storage.llen(&args[0])?))
    }

    /// LINDEX key index
    fn cmd_lindex(&self, args: &[Bytes]) -> Result<Reply> {
        exact("lindex", args, 2)?;
        let index = parse_int(&args[1])?;
        Ok(Reply::optional(self.storage.lindex(&args[0], index)?))
    }

    /// LRANGE key start stop
    fn cmd_lrange(&self, args: &[Bytes]) -> Result<Reply> {
        exact("lrange", args, 3)?;
        let start = parse_int(&args[1])?;
        let stop = parse_int(&args[2])?;
        Ok(Reply::bulks(self.storage.lrange(&args[0], start, stop)?))
    }

    /// LSET key index value
    fn cmd_lset(&self, args: &[Bytes]) -> Result<Reply> {
        exact("lset", args, 3)?;
        let index = parse_int(&args[1])?;
        self.storage.lset(&args[0], index, args[2].clone())?;
        Ok(Reply::ok())
    }

    /// LREM key count value
    fn cmd_lrem(&self, args: &[Bytes]) -> Result<Reply> {
        exact("lrem", args, 3)?;
        let count = parse_int(&args[1])?;
        Ok(Reply::count(self.storage.lrem(&args[0], count, &args[2])?))
    }

    // ========================================================================
    // Hash Commands
    // ========================================================================

    /// HSET key field value [field value ...]
    fn cmd_hset(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("hset", args, 3)?;
        let fields = pairs("hset", &args[1..])?;
        Ok(Reply::count(self.storage.hset_many(args[0].clone(), fields)?))
    }

    /// HGET key field
    fn cmd_hget(&self, args: &[Bytes]) -> Result<Reply> {
        exact("hget", args, 2)?;
        Ok(Reply::optional(self.storage.hget(&args[0], &args[1])?))
    }

    /// HEXISTS key field
    fn cmd_hexists(&self, args: &[Bytes]) -> Result<Reply> {
        exact("hexists", args, 2)?;
        Ok(Reply::boolean(self.storage.hexists(&args[0], &args[1])?))
    }

    /// HDEL key field [field ...]
    fn cmd_hdel(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("hdel", args, 2)?;
        Ok(Reply::count(self.storage.hdel(&args[0], &args[1..])?))
    }

    /// HLEN key
    fn cmd_hlen(&self, args: &[Bytes]) -> Result<Reply> {
        exact("hlen", args, 1)?;
        Ok(Reply::count(self.storage.hlen(&args[0])?))
    }

    /// HGETALL key
    fn cmd_hgetall(&self, args: &[Bytes]) -> Result<Reply> {
        exact("hgetall", args, 1)?;
        let flat = self
            .storage
            .hgetall(&args[0])?
            .into_iter()
            .flat_map(|(field, value)| [field, value]);
        Ok(Reply::bulks(flat))
    }

    /// HKEYS key
    fn cmd_hkeys(&self, args: &[Bytes]) -> Result<Reply> {
        exact("hkeys", args, 1)?;
        Ok(Reply::bulks(self.storage.hkeys(&args[0])?))
    }

    /// HVALS key
    fn cmd_hvals(&self, args: &[Bytes]) -> Result<Reply> {
        exact("hvals", args, 1)?;
        Ok(Reply::bulks(self.storage.hvals(&args[0])?))
    }

    // ========================================================================
    // Set Commands
    // ========================================================================

    /// SADD key member [member ...]
    fn cmd_sadd(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("sadd", args, 2)?;
        let added = self.storage.sadd(args[0].clone(), args[1..].to_vec())?;
        Ok(Reply::count(added))
    }

    /// SREM key member [member ...]
    fn cmd_srem(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("srem", args, 2)?;
        Ok(Reply::count(self.storage.srem(&args[0], &args[1..])?))
    }

    /// SISMEMBER key member
    fn cmd_sismember(&self, args: &[Bytes]) -> Result<Reply> {
        exact("sismember", args, 2)?;
        Ok(Reply::boolean(self.storage.sismember(&args[0], &args[1])?))
    }

    /// SMEMBERS key
    fn cmd_smembers(&self, args: &[Bytes]) -> Result<Reply> {
        exact("smembers", args, 1)?;
        Ok(Reply::bulks(self.storage.smembers(&args[0])?))
    }

    /// SCARD key
    fn cmd_scard(&self, args: &[Bytes]) -> Result<Reply> {
        exact("scard", args, 1)?;
        Ok(Reply::count(self.storage.scard(&args[0])?))
    }

    // ========================================================================
    // Sorted Set Commands
    // ========================================================================

    /// ZADD key score member [score member ...]
    fn cmd_zadd(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("zadd", args, 3)?;
        let entries = pairs("zadd", &args[1..])?
            .into_iter()
            .map(|(score, member)| Ok((parse_score(&score)?, member)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Reply::count(self.storage.zadd(args[0].clone(), entries)?))
    }

    /// ZREM key member [member ...]
    fn cmd_zrem(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("zrem", args, 2)?;
        Ok(Reply::count(self.storage.zrem(&args[0], &args[1..])?))
    }

    /// ZSCORE key member
    fn cmd_zscore(&self, args: &[Bytes]) -> Result<Reply> {
        exact("zscore", args, 2)?;
        Ok(self
            .storage
            .zscore(&args[0], &args[1])?
            .map_or(Reply::Nil, Reply::Double))
    }

    /// ZCARD key
    fn cmd_zcard(&self, args: &[Bytes]) -> Result<Reply> {
        exact("zcard", args, 1)?;
        Ok(Reply::count(self.storage.zcard(&args[0])?))
    }

    /// ZRANK key member
    fn cmd_zrank(&self, args: &[Bytes]) -> Result<Reply> {
        exact("zrank", args, 2)?;
        Ok(self
            .storage
            .zrank(&args[0], &args[1])?
            .map_or(Reply::Nil, Reply::count))
    }

    /// ZRANGE key start stop [WITHSCORES]
    fn cmd_zrange(&self, args: &[Bytes]) -> Result<Reply> {
        if args.len() != 3 && args.len() != 4 {
            return Err(Error::WrongArity("zrange".to_string()));
        }
        let with_scores = match args.get(3) {
            Some(opt) if keyword(opt) == "WITHSCORES" => true,
            Some(_) => return Err(Error::Syntax),
            None => false,
        };
        let start = parse_int(&args[1])?;
        let stop = parse_int(&args[2])?;

        let range = self.storage.zrange(&args[0], start, stop)?;
        let mut items = Vec::with_capacity(range.len() * if with_scores { 2 } else { 1 });
        for (member, score) in range {
            items.push(Reply::Bulk(member));
            if with_scores {
                items.push(Reply::Double(score));
            }
        }
        Ok(Reply::array(items))
    }

    // ========================================================================
    // Key Commands
    // ========================================================================

    /// DEL key [key ...]
    fn cmd_del(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("del", args, 1)?;
        Ok(Reply::count(self.storage.del_many(args)))
    }

    /// EXISTS key [key ...]
    fn cmd_exists(&self, args: &[Bytes]) -> Result<Reply> {
        at_least("exists", args, 1)?;
        Ok(Reply::count(self.storage.exists_many(args)))
    }

    /// EXPIRE key seconds / PEXPIRE key milliseconds
    fn cmd_expire(&self, args: &[Bytes], cmd: &str, millis: bool) -> Result<Reply> {
        exact(cmd, args, 2)?;
        let ttl = parse_int(&args[1])?;
        let set = if millis {
            self.storage.pexpire(&args[0], ttl)
        } else {
            self.storage.expire(&args[0], ttl)
        };
        Ok(Reply::boolean(set))
    }

    /// EXPIREAT key unix-seconds / PEXPIREAT key unix-milliseconds
    fn cmd_expireat(&self, args: &[Bytes], cmd: &str, millis: bool) -> Result<Reply> {
        exact(cmd, args, 2)?;
        let at = parse_int(&args[1])?;
        let set = if millis {
            self.storage.pexpire_at(&args[0], at)
        } else {
            self.storage.expire_at(&args[0], at)
        };
        Ok(Reply::boolean(set))
    }

    /// TTL key / PTTL key
    fn cmd_ttl(&self, args: &[Bytes], cmd: &str, millis: bool) -> Result<Reply> {
        exact(cmd, args, 1)?;
        Ok(Reply::integer(if millis {
            self.storage.pttl(&args[0])
        } else {
            self.storage.ttl(&args[0])
        }))
    }

    /// PERSIST key
    fn cmd_persist(&self, args: &[Bytes]) -> Result<Reply> {
        exact("persist", args, 1)?;
        Ok(Reply::boolean(self.storage.persist(&args[0])))
    }

    /// KEYS pattern
    fn cmd_keys(&self, args: &[Bytes]) -> Result<Reply> {
        exact("keys", args, 1)?;
        Ok(Reply::bulks(self.storage.keys(&args[0])?))
    }

    /// TYPE key
    fn cmd_type(&self, args: &[Bytes]) -> Result<Reply> {
        exact("type", args, 1)?;
        Ok(Reply::status(self.storage.key_type(&args[0])))
    }

    /// RENAME key newkey
    fn cmd_rename(&self, args: &[Bytes]) -> Result<Reply> {
        exact("rename", args, 2)?;
        self.storage.rename(&args[0], args[1].clone())?;
        Ok(Reply::ok())
    }

    /// RENAMENX key newkey
    fn cmd_renamenx(&self, args: &[Bytes]) -> Result<Reply> {
        exact("renamenx", args, 2)?;
        self.storage.renamenx(&args[0], args[1].clone())?;
        Ok(Reply::ok())
    }

    // ========================================================================
    // Server Commands
    // ========================================================================

    /// PING [message]
    fn cmd_ping(&self, args: &[Bytes]) -> Result<Reply> {
        match args {
            [] => Ok(Reply::status("PONG")),
            [message] => Ok(Reply::Bulk(message.clone())),
            _ => Err(Error::WrongArity("ping".to_string())),
        }
    }

    /// ECHO message
    fn cmd_echo(&self, args: &[Bytes]) -> Result<Reply> {
        exact("echo", args, 1)?;
        Ok(Reply::Bulk(args[0].clone()))
    }

    /// DBSIZE
    fn cmd_dbsize(&self, args: &[Bytes]) -> Result<Reply> {
        exact("dbsize", args, 0)?;
        Ok(Reply::count(self.storage.len()))
    }

    /// FLUSHDB / FLUSHALL
    fn cmd_flushdb(&self, args: &[Bytes]) -> Result<Reply> {
        exact("flushdb", args, 0)?;
        self.storage.flush();
        Ok(Reply::ok())
    }

    /// INFO [section]
    fn cmd_info(&self, args: &[Bytes]) -> Result<Reply> {
        if args.len() > 1 {
            return Err(Error::WrongArity("info".to_string()));
        }
        let section = args
            .first()
            .map(|s| String::from_utf8_lossy(s).to_ascii_lowercase());
        let wanted = |name: &str| match section.as_deref() {
            None | Some("all") | Some("default") | Some("everything") => true,
            Some(s) => s == name,
        };

        let stats = self.storage.stats();
        let mut info = String::new();

        if wanted("server") {
            info.push_str(&format!(
                "# Server\n\
                 flintkv_version:{}\n\
                 os:{}\n\
                 uptime_in_seconds:{}\n\n",
                crate::VERSION,
                std::env::consts::OS,
                self.start_time.elapsed().as_secs(),
            ));
        }
        if wanted("stats") {
            info.push_str(&format!(
                "# Stats\n\
                 total_commands_processed:{}\n\
                 expired_keys:{}\n\n",
                stats.commands, stats.reaped,
            ));
        }
        if wanted("keyspace") {
            info.push_str("# Keyspace\n");
            if stats.keys > 0 {
                info.push_str(&format!(
                    "db0:keys={},expires={}\n",
                    stats.keys, stats.keys_with_expiry
                ));
            }
        }

        Ok(Reply::Text(info))
    }
}
