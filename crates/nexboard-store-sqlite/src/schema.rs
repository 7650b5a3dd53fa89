//! SQL schema for the NexBoard SQLite store.
//!
//! Executed once at connection startup and stamped with `PRAGMA
//! user_version`. Future migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id     TEXT    NOT NULL UNIQUE,
    name            TEXT    NOT NULL,
    email           TEXT    NOT NULL,
    credential_hash TEXT    NOT NULL,     -- argon2 PHC string; never selected outward
    avatar_url      TEXT,
    active_status   INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT    NOT NULL,     -- RFC 3339 UTC
    modified_at     TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS users_active_email_idx
    ON users(email) WHERE active_status = 1;

CREATE TABLE IF NOT EXISTS workspaces (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id   TEXT    NOT NULL UNIQUE,
    name          TEXT    NOT NULL,
    description   TEXT,
    owner_id      INTEGER NOT NULL REFERENCES users(id),
    active_status INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT    NOT NULL,
    modified_at   TEXT
);

-- The owner row is written together with its workspace and never changed.
CREATE TABLE IF NOT EXISTS workspace_members (
    workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role         TEXT    NOT NULL CHECK (role IN ('owner', 'admin', 'member')),
    joined_at    TEXT    NOT NULL,
    PRIMARY KEY (workspace_id, user_id)
);

CREATE UNIQUE INDEX IF NOT EXISTS workspace_single_owner_idx
    ON workspace_members(workspace_id) WHERE role = 'owner';

CREATE TABLE IF NOT EXISTS boards (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id   TEXT    NOT NULL UNIQUE,
    workspace_id  INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
    created_by    INTEGER REFERENCES users(id) ON DELETE SET NULL,
    name          TEXT    NOT NULL,
    description   TEXT,
    active_status INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT    NOT NULL,
    modified_at   TEXT
);

-- Global vocabulary, not scoped to a workspace.
CREATE TABLE IF NOT EXISTS statuses (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id   TEXT    NOT NULL UNIQUE,
    name          TEXT    NOT NULL,
    color         TEXT,
    position      INTEGER NOT NULL DEFAULT 0,
    active_status INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT    NOT NULL,
    modified_at   TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS statuses_active_name_idx
    ON statuses(name) WHERE active_status = 1;

-- status_id has no ON DELETE action: deleting a referenced status fails.
CREATE TABLE IF NOT EXISTS tasks (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id   TEXT    NOT NULL UNIQUE,
    board_id      INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    status_id     INTEGER NOT NULL REFERENCES statuses(id),
    assigned_to   INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_by    INTEGER NOT NULL REFERENCES users(id),
    title         TEXT    NOT NULL,
    description   TEXT,
    priority      TEXT    NOT NULL DEFAULT 'low'
                          CHECK (priority IN ('low', 'medium', 'high')),
    due_date      TEXT,
    position      INTEGER NOT NULL DEFAULT 0,
    active_status INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT    NOT NULL,
    modified_at   TEXT
);

CREATE INDEX IF NOT EXISTS tasks_board_idx  ON tasks(board_id);
CREATE INDEX IF NOT EXISTS tasks_status_idx ON tasks(status_id);
CREATE INDEX IF NOT EXISTS boards_workspace_idx ON boards(workspace_id);
CREATE INDEX IF NOT EXISTS members_user_idx ON workspace_members(user_id);

PRAGMA user_version = 1;
";
