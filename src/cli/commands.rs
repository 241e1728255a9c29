use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "protokoll")]
#[command(version, about = "Protokoll-Assistent für Sitzungen des Studierendenparlaments")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new protokoll project in the current directory
    Init,

    /// Manage Sitzungen (meeting records)
    Sitzung(SitzungCommand),

    /// Manage attendance of a Sitzung
    Teilnehmer(TeilnehmerCommand),

    /// Manage the roles of a Sitzung
    Rolle(RolleCommand),

    /// Manage the agenda (Tagesordnungspunkte)
    Top(TopCommand),

    /// Manage Anträge nested under an agenda item
    Antrag(AntragCommand),

    /// Track meeting times (opening, pauses, closing)
    Zeiten(ZeitenCommand),

    /// Manage attached documents
    Dokument(DokumentCommand),

    /// Manage version snapshots of a Sitzung
    Snapshot(SnapshotCommand),

    /// Keep an editing session open, writing periodic Auto-Save snapshots
    Session {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Auto-save interval in minutes
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },

    /// Export the protocol of a Sitzung
    Export {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Output format: txt, md, json or pages
        #[arg(long, default_value = "txt")]
        format: String,

        /// Output file (defaults to Stupa-Protokoll_<date>.<ext>)
        #[arg(long, short = 'o')]
        output: Option<String>,
    },

    /// Import a Sitzung from an exported file (.json lossless, .txt best-effort)
    Import {
        /// Path to the exported file
        file: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage reusable agenda templates
    Template(TemplateCommand),

    /// Show or change global settings
    Settings(SettingsCommand),

    /// Compose a mailto invitation for a Sitzung
    Invite {
        /// Sitzung id (UUID prefix)
        sitzung: String,
    },
}

#[derive(Args, Debug)]
pub struct SitzungCommand {
    #[command(subcommand)]
    pub action: SitzungAction,
}

#[derive(Subcommand, Debug)]
pub enum SitzungAction {
    /// Create a new Sitzung
    Add {
        /// Sitzung title
        title: String,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(long, default_value = "14:00")]
        time: String,

        /// Agenda template id to instantiate
        #[arg(long)]
        template: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all Sitzungen
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single Sitzung
    Get {
        /// Sitzung id (UUID prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update basic fields of a Sitzung
    Update {
        /// Sitzung id (UUID prefix)
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Start time (HH:MM)
        #[arg(long)]
        time: Option<String>,

        /// Status (planned, ongoing, completed)
        #[arg(long)]
        status: Option<String>,

        /// Date line for the next meeting
        #[arg(long)]
        next_meeting: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a Sitzung
    Delete {
        /// Sitzung id (UUID prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show quorum, completion and export readiness
    Status {
        /// Sitzung id (UUID prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct TeilnehmerCommand {
    #[command(subcommand)]
    pub action: TeilnehmerAction,
}

#[derive(Subcommand, Debug)]
pub enum TeilnehmerAction {
    /// Add a participant
    Add {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Participant name
        name: String,

        /// Role name
        #[arg(long, default_value = "Mitglied")]
        role: String,
    },

    /// Flip a participant's presence flag
    Toggle {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Participant id (UUID prefix)
        id: String,
    },

    /// Remove a participant
    Remove {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Participant id (UUID prefix)
        id: String,
    },

    /// List participants
    List {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct RolleCommand {
    #[command(subcommand)]
    pub action: RolleAction,
}

#[derive(Subcommand, Debug)]
pub enum RolleAction {
    /// Add a role (allowed names: Mitglied, Gast)
    Add {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Role name
        name: String,

        /// Badge color (primary, secondary, accent, success, warning, destructive, muted)
        #[arg(long, default_value = "muted")]
        color: String,
    },

    /// Rename a role (voting eligibility follows the name)
    Rename {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Role id (UUID prefix)
        id: String,

        /// New name
        name: String,
    },

    /// Remove a role (default roles are protected)
    Remove {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Role id (UUID prefix)
        id: String,
    },

    /// List roles
    List {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct TopCommand {
    #[command(subcommand)]
    pub action: TopAction,
}

#[derive(Subcommand, Debug)]
pub enum TopAction {
    /// Append an agenda item
    Add {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Item title
        title: String,

        /// Mark this item as the Anträge section
        #[arg(long)]
        antraege_section: bool,
    },

    /// Record a voting result for an item
    Vote {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        number: usize,

        #[arg(long)]
        ja: u32,

        #[arg(long)]
        nein: u32,

        #[arg(long)]
        enthaltungen: u32,
    },

    /// Set the notes of an item
    Note {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        number: usize,

        /// Note text
        text: String,
    },

    /// Mark an item as completed
    Complete {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        number: usize,
    },

    /// Attach a document name to an item
    Attach {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        number: usize,

        /// Document name
        document: String,
    },

    /// Remove an agenda item
    Remove {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        number: usize,
    },

    /// List agenda items
    List {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AntragCommand {
    #[command(subcommand)]
    pub action: AntragAction,
}

#[derive(Subcommand, Debug)]
pub enum AntragAction {
    /// Add an Antrag under an agenda item
    Add {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        top: usize,

        /// Antrag title
        title: String,

        /// Antrag type: voting or input
        #[arg(long = "type", default_value = "voting")]
        antrag_type: String,
    },

    /// Record a voting result for an Antrag
    Vote {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        top: usize,

        /// Antrag number within the TOP (1-based)
        number: usize,

        #[arg(long)]
        ja: u32,

        #[arg(long)]
        nein: u32,

        #[arg(long)]
        enthaltungen: u32,
    },

    /// Record a free-text result for an input Antrag
    Input {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        top: usize,

        /// Antrag number within the TOP (1-based)
        number: usize,

        /// Result text
        text: String,
    },

    /// List Anträge of an agenda item
    List {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// TOP number (1-based)
        top: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ZeitenCommand {
    #[command(subcommand)]
    pub action: ZeitenAction,
}

#[derive(Subcommand, Debug)]
pub enum ZeitenAction {
    /// Open the meeting (sets status to ongoing)
    Open {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Time (HH:MM, defaults to now)
        #[arg(long)]
        time: Option<String>,
    },

    /// Start a pause
    Pause {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Time (HH:MM, defaults to now)
        #[arg(long)]
        time: Option<String>,
    },

    /// End the running pause
    Resume {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Time (HH:MM, defaults to now)
        #[arg(long)]
        time: Option<String>,
    },

    /// Close the meeting (sets status to completed)
    Close {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Time (HH:MM, defaults to now)
        #[arg(long)]
        time: Option<String>,
    },

    /// Show the time log
    Show {
        /// Sitzung id (UUID prefix)
        sitzung: String,
    },
}

#[derive(Args, Debug)]
pub struct DokumentCommand {
    #[command(subcommand)]
    pub action: DokumentAction,
}

#[derive(Subcommand, Debug)]
pub enum DokumentAction {
    /// Register a document
    Add {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Document name
        name: String,
    },

    /// Remove a document
    Remove {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Document id (UUID prefix) or name
        id: String,
    },

    /// List documents
    List {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct SnapshotCommand {
    #[command(subcommand)]
    pub action: SnapshotAction,
}

#[derive(Subcommand, Debug)]
pub enum SnapshotAction {
    /// Create a named snapshot of the current state
    Create {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Snapshot label (e.g. "Vor Abstimmung TOP 3")
        label: String,
    },

    /// List snapshots
    List {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a snapshot onto the Sitzung
    Restore {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Snapshot id (UUID prefix)
        id: String,

        /// Skip the pre-restore checkpoint prompt
        #[arg(long)]
        no_checkpoint: bool,
    },

    /// Delete a snapshot
    Delete {
        /// Sitzung id (UUID prefix)
        sitzung: String,

        /// Snapshot id (UUID prefix)
        id: String,
    },

    /// Drop the whole version history of a Sitzung
    Clear {
        /// Sitzung id (UUID prefix)
        sitzung: String,
    },
}

#[derive(Args, Debug)]
pub struct TemplateCommand {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List templates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a template with its agenda
    Show {
        /// Template id
        id: String,
    },

    /// Save a new template from a Sitzung's agenda
    Add {
        /// Template id (slug)
        id: String,

        /// Template name
        name: String,

        /// Sitzung id whose agenda seeds the template (UUID prefix)
        #[arg(long)]
        from: String,

        /// Description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a template (built-ins are protected)
    Delete {
        /// Template id
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the global settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the global e-mail identities
    SetEmail {
        /// Sender address
        #[arg(long)]
        sender_email: String,

        /// Sender display name
        #[arg(long)]
        sender_name: String,

        /// Collector address invitations are sent to
        #[arg(long)]
        collector_email: String,
    },
}
