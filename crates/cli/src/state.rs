//! Session state: the open database and the table commands act on.

use roster::{Error, LoginEntry, Record, Records, Roster, POSTS_TABLE};

use crate::parse::Request;

/// Result of one executed request.
#[derive(Debug)]
pub enum Output {
    Record(Record),
    MaybeRecord(Option<Record>),
    Records(Vec<Record>),
    Deleted(bool),
    Login(LoginEntry),
    Logins(Vec<LoginEntry>),
}

/// One CLI session.
pub struct SessionState {
    db: Roster,
    table: Records,
}

impl SessionState {
    pub fn new(db: Roster, table: &str) -> Result<Self, Error> {
        let table = open_table(&db, table)?;
        Ok(Self { db, table })
    }

    /// Name of the current table.
    pub fn table(&self) -> &str {
        self.table.table().as_str()
    }

    /// Switch the table later commands act on.
    pub fn use_table(&mut self, name: &str) -> Result<(), Error> {
        self.table = open_table(&self.db, name)?;
        Ok(())
    }

    pub fn execute(&mut self, request: Request) -> Result<Output, Error> {
        match request {
            Request::Create { id, fields } => {
                let fields = fields.as_deref().unwrap_or("{}");
                self.table.create_json(&id, fields).map(Output::Record)
            }
            Request::Get { id } => self.table.get(&id).map(Output::MaybeRecord),
            Request::Update { request } => self.table.update_json(&request).map(Output::Record),
            Request::Delete { id, expect } => self.table.delete(&id, expect).map(Output::Deleted),
            Request::List => self.table.list().map(Output::Records),
            Request::LoginRecord { uid } => self.db.logins.record(&uid).map(Output::Login),
            Request::LoginRecent { limit, uid } => match uid {
                Some(uid) => self.db.logins.for_user(&uid, limit),
                None => self.db.logins.recent_limit(limit),
            }
            .map(Output::Logins),
        }
    }

    /// Flush pending writes before exit.
    pub fn close(&self) -> Result<(), Error> {
        self.db.close()
    }
}

fn open_table(db: &Roster, name: &str) -> Result<Records, Error> {
    if name == POSTS_TABLE {
        Ok(db.posts.clone())
    } else {
        db.table(name)
    }
}
