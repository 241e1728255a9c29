use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{Local, Utc};
use uuid::Uuid;

use crate::email;
use crate::entity::{
    AgendaItem, Antrag, AntragType, Document, EmailSettings, Participant, Role, RoleColor,
    Sitzung, SitzungData, SitzungStatus, SitzungTemplate, TemplateAgendaItem, VotingResult,
};
use crate::error::{ProtokollError, Result};
use crate::protocol::{
    self, completion_stats, export_ready, paginate, parse_json, parse_protocol_text,
    render_markdown, render_protocol,
};
use crate::quorum;
use crate::storage::{FileBackend, SitzungUpdate, Store};
use crate::version::{AutoSaver, VersionManager, AUTO_SAVE_LABEL, MAX_SNAPSHOTS};

/// Find the project root by looking for .protokoll/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(".protokoll").exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_store() -> Result<Store> {
    let backend = FileBackend::open(&find_project_root())?;
    Ok(Store::new(Box::new(backend)))
}

fn short(id: &Uuid) -> String {
    id.to_string()[..7].to_string()
}

fn now_hhmm() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Resolve a Sitzung by UUID prefix.
fn resolve_sitzung(store: &Store, id: &str) -> Result<Sitzung> {
    store
        .list_sitzungen()
        .into_iter()
        .find(|s| s.id.to_string().starts_with(id))
        .ok_or_else(|| ProtokollError::SitzungNotFound(id.to_string()))
}

fn find_by_prefix<'a, T>(
    items: &'a mut [T],
    prefix: &str,
    id_of: impl Fn(&T) -> Uuid,
    what: &str,
) -> Result<&'a mut T> {
    items
        .iter_mut()
        .find(|item| id_of(item).to_string().starts_with(prefix))
        .ok_or_else(|| ProtokollError::EntityNotFound(format!("{} {}", what, prefix)))
}

fn top_mut(items: &mut [AgendaItem], number: usize) -> Result<&mut AgendaItem> {
    if number == 0 || number > items.len() {
        return Err(ProtokollError::EntityNotFound(format!("TOP {}", number)));
    }
    Ok(&mut items[number - 1])
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProtokollError::Validation(format!(
            "{} darf nicht leer sein",
            what
        )));
    }
    Ok(())
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let backend = FileBackend::init(&root)?;
    let store = Store::new(Box::new(backend));
    // Seed the meeting collection so the project is recognizable.
    store.save_json("sitzungen", &Vec::<Sitzung>::new())?;

    println!("Initialized protokoll project in {}", root.display());
    Ok(())
}

// --- Sitzung --------------------------------------------------------------

pub fn handle_sitzung_add(
    title: String,
    date: String,
    time: String,
    template: Option<String>,
    json: bool,
) -> Result<()> {
    let store = open_store()?;

    require_non_empty(&title, "Titel")?;
    require_non_empty(&date, "Datum")?;

    let mut data = SitzungData {
        title,
        date,
        time,
        ..Default::default()
    };

    if let Some(template_id) = template {
        let template = store
            .get_template(&template_id)
            .ok_or_else(|| ProtokollError::EntityNotFound(format!("Vorlage {}", template_id)))?;
        data.agenda_items = template.instantiate_agenda();
        if let Some(roles) = template.roles {
            data.roles = roles;
        }
    }

    let sitzung = store.create_sitzung(data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sitzung)?);
    } else {
        println!(
            "Sitzung angelegt ({}) - {} am {}",
            short(&sitzung.id),
            sitzung.data.title,
            sitzung.data.date
        );
    }
    Ok(())
}

pub fn handle_sitzung_list(json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzungen = store.list_sitzungen();

    if json {
        println!("{}", serde_json::to_string_pretty(&sitzungen)?);
    } else if sitzungen.is_empty() {
        println!("Keine Sitzungen vorhanden.");
    } else {
        println!("Sitzungen:\n");
        for s in sitzungen {
            println!(
                "  ({}) [{}] {} - {} {}",
                short(&s.id),
                s.data.status,
                s.data.title,
                s.data.date,
                s.data.time
            );
        }
    }
    Ok(())
}

pub fn handle_sitzung_get(id: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sitzung)?);
        return Ok(());
    }

    let data = &sitzung.data;
    println!("Sitzung ({})", sitzung.id);
    println!("Titel: {}", data.title);
    println!("Datum: {} {}", data.date, data.time);
    println!("Status: {}", data.status);
    println!(
        "Teilnehmer: {} ({} anwesend)",
        data.participants.len(),
        data.participants.iter().filter(|p| p.present).count()
    );
    println!("Tagesordnungspunkte: {}", data.agenda_items.len());
    if !data.next_meeting_date.is_empty() {
        println!("Nächste Sitzung: {}", data.next_meeting_date);
    }
    Ok(())
}

pub fn handle_sitzung_update(
    id: String,
    title: Option<String>,
    date: Option<String>,
    time: Option<String>,
    status: Option<String>,
    next_meeting: Option<String>,
    json: bool,
) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &id)?;

    if let Some(title) = &title {
        require_non_empty(title, "Titel")?;
    }
    let status = match status {
        Some(s) => Some(
            s.parse::<SitzungStatus>()
                .map_err(ProtokollError::Validation)?,
        ),
        None => None,
    };

    let updated = store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            title,
            date,
            time,
            status,
            next_meeting_date: next_meeting,
            ..Default::default()
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!(
            "Sitzung aktualisiert ({}) - {}",
            short(&updated.id),
            updated.data.title
        );
    }
    Ok(())
}

pub fn handle_sitzung_delete(id: String, force: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &id)?;

    if !force {
        eprintln!(
            "Sitzung ({}) - {} löschen? [y/N] ",
            short(&sitzung.id),
            sitzung.data.title
        );

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Abgebrochen.");
                return Ok(());
            }
        } else {
            return Err(ProtokollError::Validation(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    store.delete_sitzung(&sitzung.id)?;
    println!(
        "Sitzung gelöscht ({}) - {}",
        short(&sitzung.id),
        sitzung.data.title
    );
    Ok(())
}

pub fn handle_sitzung_status(id: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &id)?;
    let data = &sitzung.data;

    let quorum = quorum::quorum_status(&data.participants, &data.roles);
    let stats = completion_stats(data);
    let ready = export_ready(data);

    if json {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct StatusJson {
            quorum: quorum::QuorumStatus,
            stats: protocol::CompletionStats,
            export_ready: bool,
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&StatusJson {
                quorum,
                stats,
                export_ready: ready,
            })?
        );
        return Ok(());
    }

    println!("Status: {}", data.status);
    println!(
        "Beschlussfähigkeit: {} ({} von {} stimmberechtigt anwesend)",
        if quorum.has_quorum {
            "GEGEBEN"
        } else {
            "NICHT GEGEBEN"
        },
        quorum.present,
        quorum.total
    );
    println!(
        "Tagesordnung: {} von {} erledigt ({}%)",
        stats.completed_items, stats.total_items, stats.percentage
    );
    println!(
        "Export: {}",
        if ready {
            "bereit"
        } else {
            "nicht bereit (Teilnehmerliste und Tagesordnung erforderlich)"
        }
    );
    Ok(())
}

// --- Teilnehmer -----------------------------------------------------------

pub fn handle_teilnehmer_add(sitzung: String, name: String, role: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    require_non_empty(&name, "Name")?;

    let participant = Participant::new(name, role);
    let mut participants = sitzung.data.participants;
    participants.push(participant.clone());

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            participants: Some(participants),
            ..Default::default()
        },
    )?;

    println!(
        "Teilnehmer hinzugefügt ({}) - {} [{}]",
        short(&participant.id),
        participant.name,
        participant.role
    );
    Ok(())
}

pub fn handle_teilnehmer_toggle(sitzung: String, id: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut participants = sitzung.data.participants;
    let participant = find_by_prefix(&mut participants, &id, |p| p.id, "Teilnehmer")?;
    participant.toggle_presence();
    let name = participant.name.clone();
    let present = participant.present;

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            participants: Some(participants),
            ..Default::default()
        },
    )?;

    println!(
        "{} ist jetzt {}",
        name,
        if present { "anwesend" } else { "abwesend" }
    );
    Ok(())
}

pub fn handle_teilnehmer_remove(sitzung: String, id: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut participants = sitzung.data.participants;
    let participant = find_by_prefix(&mut participants, &id, |p| p.id, "Teilnehmer")?;
    let removed_id = participant.id;
    let name = participant.name.clone();
    participants.retain(|p| p.id != removed_id);

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            participants: Some(participants),
            ..Default::default()
        },
    )?;

    println!("Teilnehmer entfernt - {}", name);
    Ok(())
}

pub fn handle_teilnehmer_list(sitzung: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let participants = &sitzung.data.participants;

    if json {
        println!("{}", serde_json::to_string_pretty(participants)?);
    } else if participants.is_empty() {
        println!("Keine Teilnehmer vorhanden.");
    } else {
        println!("Teilnehmer:\n");
        for p in participants {
            println!(
                "  ({}) [{}] {} {}",
                short(&p.id),
                p.role,
                if p.present { "✓" } else { "○" },
                p.name
            );
        }
    }
    Ok(())
}

// --- Rollen ---------------------------------------------------------------

pub fn handle_rolle_add(sitzung: String, name: String, color: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let color = color
        .parse::<RoleColor>()
        .map_err(ProtokollError::Validation)?;

    if sitzung.data.roles.iter().any(|r| r.name == name.trim()) {
        return Err(ProtokollError::Validation(
            "Diese Rolle existiert bereits".to_string(),
        ));
    }

    let role = Role::new(&name, color)?;
    let mut roles = sitzung.data.roles;
    roles.push(role.clone());

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            roles: Some(roles),
            ..Default::default()
        },
    )?;

    println!(
        "Rolle hinzugefügt ({}) - {} [stimmberechtigt: {}]",
        short(&role.id),
        role.name,
        if role.can_vote { "ja" } else { "nein" }
    );
    Ok(())
}

pub fn handle_rolle_rename(sitzung: String, id: String, name: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut roles = sitzung.data.roles;
    let role = find_by_prefix(&mut roles, &id, |r| r.id, "Rolle")?;
    role.rename(&name)?;
    let renamed = role.clone();

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            roles: Some(roles),
            ..Default::default()
        },
    )?;

    println!(
        "Rolle umbenannt ({}) - {} [stimmberechtigt: {}]",
        short(&renamed.id),
        renamed.name,
        if renamed.can_vote { "ja" } else { "nein" }
    );
    Ok(())
}

pub fn handle_rolle_remove(sitzung: String, id: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut roles = sitzung.data.roles;
    let role = find_by_prefix(&mut roles, &id, |r| r.id, "Rolle")?;
    if role.is_default {
        return Err(ProtokollError::Validation(
            "Standardrollen können nicht gelöscht werden".to_string(),
        ));
    }
    let removed_id = role.id;
    let name = role.name.clone();
    roles.retain(|r| r.id != removed_id);

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            roles: Some(roles),
            ..Default::default()
        },
    )?;

    println!("Rolle entfernt - {}", name);
    Ok(())
}

pub fn handle_rolle_list(sitzung: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let roles = &sitzung.data.roles;

    if json {
        println!("{}", serde_json::to_string_pretty(roles)?);
    } else if roles.is_empty() {
        println!("Keine Rollen vorhanden.");
    } else {
        println!("Rollen:\n");
        for r in roles {
            println!(
                "  ({}) [{}] {}{}{}",
                short(&r.id),
                r.color,
                r.name,
                if r.can_vote { " *stimmberechtigt" } else { "" },
                if r.is_default { " (Standard)" } else { "" }
            );
        }
    }
    Ok(())
}

// --- Tagesordnung ---------------------------------------------------------

pub fn handle_top_add(sitzung: String, title: String, antraege_section: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    require_non_empty(&title, "Titel")?;

    let mut item = AgendaItem::new(title);
    item.is_antraege_section = antraege_section;
    let mut agenda_items = sitzung.data.agenda_items;
    agenda_items.push(item);
    let number = agenda_items.len();

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("TOP {} angelegt", number);
    Ok(())
}

pub fn handle_top_vote(
    sitzung: String,
    number: usize,
    ja: u32,
    nein: u32,
    enthaltungen: u32,
) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    if sitzung.data.status != SitzungStatus::Ongoing {
        return Err(ProtokollError::Validation(
            "Die Sitzung muss gestartet sein, um Abstimmungen zu erfassen".to_string(),
        ));
    }

    let result = VotingResult::new(ja, nein, enthaltungen);
    let eligible = quorum::eligible_voters(&sitzung.data.participants, &sitzung.data.roles) as u32;
    if eligible > 0 && result.total() != eligible {
        return Err(ProtokollError::Validation(format!(
            "Anzahl der Stimmen ({}) entspricht nicht der Anzahl stimmberechtigter Teilnehmer ({})",
            result.total(),
            eligible
        )));
    }

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, number)?;
    item.voting_result = Some(result);
    let title = item.title.clone();

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!(
        "TOP {}: {} - {} Ja, {} Nein, {} Enthaltungen: {}",
        number,
        title,
        ja,
        nein,
        enthaltungen,
        result.verdict()
    );
    Ok(())
}

pub fn handle_top_note(sitzung: String, number: usize, text: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, number)?;
    item.notes = text;

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("Anmerkung zu TOP {} gespeichert", number);
    Ok(())
}

pub fn handle_top_complete(sitzung: String, number: usize) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, number)?;
    item.completed = true;
    let title = item.title.clone();

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("TOP {} abgeschlossen - {}", number, title);
    Ok(())
}

pub fn handle_top_attach(sitzung: String, number: usize, document: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, number)?;
    item.document_name = Some(document.clone());

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("Dokument '{}' an TOP {} angehängt", document, number);
    Ok(())
}

pub fn handle_top_remove(sitzung: String, number: usize) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut agenda_items = sitzung.data.agenda_items;
    if number == 0 || number > agenda_items.len() {
        return Err(ProtokollError::EntityNotFound(format!("TOP {}", number)));
    }
    let removed = agenda_items.remove(number - 1);

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("TOP {} entfernt - {}", number, removed.title);
    Ok(())
}

pub fn handle_top_list(sitzung: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let items = &sitzung.data.agenda_items;

    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("Keine Tagesordnungspunkte vorhanden.");
    } else {
        println!("Tagesordnung:\n");
        for (index, item) in items.iter().enumerate() {
            let vote = item
                .voting_result
                .map(|v| format!(" [{}]", v.verdict()))
                .unwrap_or_default();
            println!(
                "  TOP {}: {} {}{}{}",
                index + 1,
                if item.completed { "✓" } else { "○" },
                item.title,
                vote,
                if item.is_antraege_section {
                    format!(" ({} Anträge)", item.antraege.len())
                } else {
                    String::new()
                }
            );
        }
    }
    Ok(())
}

// --- Anträge --------------------------------------------------------------

fn antrag_mut(item: &mut AgendaItem, number: usize) -> Result<&mut Antrag> {
    if number == 0 || number > item.antraege.len() {
        return Err(ProtokollError::EntityNotFound(format!("Antrag {}", number)));
    }
    Ok(&mut item.antraege[number - 1])
}

pub fn handle_antrag_add(
    sitzung: String,
    top: usize,
    title: String,
    antrag_type: String,
) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    require_non_empty(&title, "Titel")?;
    let antrag_type = antrag_type
        .parse::<AntragType>()
        .map_err(ProtokollError::Validation)?;

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, top)?;
    if !item.is_antraege_section {
        return Err(ProtokollError::Validation(format!(
            "TOP {} ist nicht der Anträge-Abschnitt",
            top
        )));
    }
    item.antraege.push(Antrag::new(title, antrag_type));
    item.sync_completed_from_antraege();
    let count = item.antraege.len();

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("Antrag {} unter TOP {} angelegt", count, top);
    Ok(())
}

pub fn handle_antrag_vote(
    sitzung: String,
    top: usize,
    number: usize,
    ja: u32,
    nein: u32,
    enthaltungen: u32,
) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    if sitzung.data.status != SitzungStatus::Ongoing {
        return Err(ProtokollError::Validation(
            "Die Sitzung muss gestartet sein, um Abstimmungen zu erfassen".to_string(),
        ));
    }

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, top)?;
    let antrag = antrag_mut(item, number)?;
    if antrag.antrag_type != AntragType::Voting {
        return Err(ProtokollError::Validation(format!(
            "Antrag {} ist kein Abstimmungsantrag",
            number
        )));
    }
    let result = VotingResult::new(ja, nein, enthaltungen);
    antrag.record_vote(result);
    item.sync_completed_from_antraege();

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("Antrag {} abgestimmt: {}", number, result.verdict());
    Ok(())
}

pub fn handle_antrag_input(
    sitzung: String,
    top: usize,
    number: usize,
    text: String,
) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, top)?;
    let antrag = antrag_mut(item, number)?;
    if antrag.antrag_type != AntragType::Input {
        return Err(ProtokollError::Validation(format!(
            "Antrag {} ist kein Eingabeantrag",
            number
        )));
    }
    antrag.record_input(text);
    item.sync_completed_from_antraege();

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            agenda_items: Some(agenda_items),
            ..Default::default()
        },
    )?;

    println!("Ergebnis für Antrag {} gespeichert", number);
    Ok(())
}

pub fn handle_antrag_list(sitzung: String, top: usize, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut agenda_items = sitzung.data.agenda_items;
    let item = top_mut(&mut agenda_items, top)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&item.antraege)?);
    } else if item.antraege.is_empty() {
        println!("Keine Anträge vorhanden.");
    } else {
        println!("Anträge zu TOP {}:\n", top);
        for (index, antrag) in item.antraege.iter().enumerate() {
            let result = match (&antrag.voting_result, antrag.antrag_type) {
                (Some(v), _) => format!(" [{}]", v.verdict()),
                (None, AntragType::Input) if !antrag.input_result.is_empty() => {
                    format!(" [{}]", antrag.input_result)
                }
                _ => String::new(),
            };
            println!(
                "  Antrag {}: {} {} ({}){}",
                index + 1,
                if antrag.completed { "✓" } else { "○" },
                antrag.title,
                antrag.antrag_type,
                result
            );
        }
    }
    Ok(())
}

// --- Sitzungszeiten -------------------------------------------------------

pub fn handle_zeiten_open(sitzung: String, time: Option<String>) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let time = time.unwrap_or_else(now_hhmm);

    let mut times = sitzung.data.meeting_times;
    times.open_meeting(time.clone())?;

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            meeting_times: Some(times),
            status: Some(SitzungStatus::Ongoing),
            ..Default::default()
        },
    )?;

    println!("Sitzung eröffnet um {} Uhr", time);
    Ok(())
}

pub fn handle_zeiten_pause(sitzung: String, time: Option<String>) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let time = time.unwrap_or_else(now_hhmm);

    let mut times = sitzung.data.meeting_times;
    times.start_pause(time.clone())?;

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            meeting_times: Some(times),
            ..Default::default()
        },
    )?;

    println!("Pause gestartet um {} Uhr", time);
    Ok(())
}

pub fn handle_zeiten_resume(sitzung: String, time: Option<String>) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let time = time.unwrap_or_else(now_hhmm);

    let mut times = sitzung.data.meeting_times;
    if times.open_pause().is_none() {
        return Err(ProtokollError::Validation(
            "Es läuft keine Pause".to_string(),
        ));
    }
    times.end_pause(time.clone());

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            meeting_times: Some(times),
            ..Default::default()
        },
    )?;

    println!("Pause beendet um {} Uhr", time);
    Ok(())
}

pub fn handle_zeiten_close(sitzung: String, time: Option<String>) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let time = time.unwrap_or_else(now_hhmm);

    let mut times = sitzung.data.meeting_times;
    times.close_meeting(time.clone())?;

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            meeting_times: Some(times),
            status: Some(SitzungStatus::Completed),
            ..Default::default()
        },
    )?;

    println!("Sitzung beendet um {} Uhr", time);
    Ok(())
}

pub fn handle_zeiten_show(sitzung: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let times = &sitzung.data.meeting_times;

    match &times.opening {
        Some(opening) => println!("Eröffnung: {} Uhr", opening),
        None => {
            println!("Die Sitzung wurde noch nicht eröffnet.");
            return Ok(());
        }
    }
    for (index, pause) in times.pauses.iter().enumerate() {
        println!(
            "Pause {}: {} - {}",
            index + 1,
            pause.start,
            pause.end.as_deref().unwrap_or("läuft")
        );
    }
    if let Some(closing) = &times.closing {
        println!("Schluss: {} Uhr", closing);
    }
    if let Some(duration) = times.total_duration() {
        println!("Gesamtdauer: {}", duration);
    }
    Ok(())
}

// --- Dokumente ------------------------------------------------------------

pub fn handle_dokument_add(sitzung: String, name: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    require_non_empty(&name, "Name")?;

    let document = Document::new(name);
    let mut documents = sitzung.data.documents;
    documents.push(document.clone());

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            documents: Some(documents),
            ..Default::default()
        },
    )?;

    println!("Dokument registriert ({}) - {}", short(&document.id), document.name);
    Ok(())
}

pub fn handle_dokument_remove(sitzung: String, id: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let mut documents = sitzung.data.documents;
    let before = documents.len();
    documents.retain(|d| !d.id.to_string().starts_with(&id) && d.name != id);
    if documents.len() == before {
        return Err(ProtokollError::EntityNotFound(format!("Dokument {}", id)));
    }

    store.update_sitzung(
        &sitzung.id,
        SitzungUpdate {
            documents: Some(documents),
            ..Default::default()
        },
    )?;

    println!("Dokument entfernt");
    Ok(())
}

pub fn handle_dokument_list(sitzung: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;
    let documents = &sitzung.data.documents;

    if json {
        println!("{}", serde_json::to_string_pretty(documents)?);
    } else if documents.is_empty() {
        println!("Keine Dokumente vorhanden.");
    } else {
        println!("Dokumente:\n");
        for d in documents {
            println!("  ({}) {}", short(&d.id), d.name);
        }
    }
    Ok(())
}

// --- Snapshots ------------------------------------------------------------

pub fn handle_snapshot_create(sitzung: String, label: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    require_non_empty(&label, "Snapshot-Name")?;

    let manager = VersionManager::new(&store, sitzung.id);
    let snapshot = manager.create_snapshot(&label, false)?;

    println!(
        "Snapshot erstellt ({}) - {}",
        short(&snapshot.id),
        snapshot.label
    );
    Ok(())
}

pub fn handle_snapshot_list(sitzung: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let manager = VersionManager::new(&store, sitzung.id);
    let history = manager.history();

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else if history.snapshots.is_empty() {
        println!("Keine Snapshots vorhanden.");
    } else {
        println!(
            "Snapshots ({} von max. {}):\n",
            history.snapshots.len(),
            MAX_SNAPSHOTS
        );
        for s in &history.snapshots {
            println!(
                "  ({}) {} [{}] {}",
                short(&s.id),
                s.timestamp.format("%Y-%m-%d %H:%M:%S"),
                if s.auto_save { "auto" } else { "manuell" },
                s.label
            );
        }
    }
    Ok(())
}

pub fn handle_snapshot_restore(sitzung: String, id: String, no_checkpoint: bool) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let manager = VersionManager::new(&store, sitzung.id);
    let snapshot = manager
        .history()
        .snapshots
        .into_iter()
        .find(|s| s.id.to_string().starts_with(&id))
        .ok_or_else(|| ProtokollError::EntityNotFound(format!("Snapshot {}", id)))?;

    // Offer a safety checkpoint of the current state before overwriting.
    if !no_checkpoint {
        manager.create_snapshot("Vor Wiederherstellung", false)?;
    }

    manager.restore(&snapshot)?;
    println!(
        "Version wiederhergestellt ({}) - {}",
        short(&snapshot.id),
        snapshot.label
    );
    Ok(())
}

pub fn handle_snapshot_delete(sitzung: String, id: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let manager = VersionManager::new(&store, sitzung.id);
    let snapshot_id = manager
        .history()
        .snapshots
        .iter()
        .find(|s| s.id.to_string().starts_with(&id))
        .map(|s| s.id)
        .ok_or_else(|| ProtokollError::EntityNotFound(format!("Snapshot {}", id)))?;

    manager.delete_snapshot(&snapshot_id)?;
    println!("Snapshot gelöscht");
    Ok(())
}

pub fn handle_snapshot_clear(sitzung: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let manager = VersionManager::new(&store, sitzung.id);
    manager.clear()?;
    println!("Versionshistorie geleert");
    Ok(())
}

/// Cooperative auto-save loop for a live editing session. Runs until
/// interrupted (Ctrl+C tears the session down, which also ends the
/// schedule); one poll tick is a fraction of the save interval.
pub fn handle_session(sitzung: String, interval: u64) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    if interval == 0 {
        return Err(ProtokollError::Validation(
            "Intervall muss mindestens 1 Minute betragen".to_string(),
        ));
    }

    let manager = VersionManager::new(&store, sitzung.id);
    let mut saver = AutoSaver::with_interval(Utc::now(), chrono::Duration::minutes(interval as i64));

    println!(
        "Auto-Save aktiv für ({}) - {} (alle {} Minuten, Strg+C beendet)",
        short(&sitzung.id),
        sitzung.data.title,
        interval
    );

    loop {
        std::thread::sleep(std::time::Duration::from_secs(15));
        if saver.poll(Utc::now()) {
            // A deleted Sitzung ends the session via the error path.
            let snapshot = manager.create_snapshot(AUTO_SAVE_LABEL, true)?;
            println!(
                "Auto-Save erstellt ({}) um {}",
                short(&snapshot.id),
                snapshot.timestamp.format("%H:%M:%S")
            );
        }
    }
}

// --- Export / Import ------------------------------------------------------

pub fn handle_export(sitzung: String, format: String, output: Option<String>) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    if !export_ready(&sitzung.data) {
        return Err(ProtokollError::Validation(
            "Protokoll ist noch nicht bereit für den Export (Teilnehmerliste und Tagesordnung erforderlich)"
                .to_string(),
        ));
    }

    let generated_at = Utc::now();
    let (content, extension) = match format.as_str() {
        "txt" => (render_protocol(&sitzung.data, generated_at), "txt"),
        "md" => (render_markdown(&sitzung.data, generated_at), "md"),
        "json" => (serde_json::to_string_pretty(&sitzung)?, "json"),
        "pages" => (
            serde_json::to_string_pretty(&paginate(&sitzung.data, generated_at))?,
            "pages.json",
        ),
        other => {
            return Err(ProtokollError::Validation(format!(
                "Unbekanntes Exportformat '{}'. Gültig: txt, md, json, pages",
                other
            )));
        }
    };

    let path = output.unwrap_or_else(|| {
        format!(
            "Stupa-Protokoll_{}.{}",
            generated_at.format("%Y-%m-%d"),
            extension
        )
    });
    fs::write(&path, content)?;

    println!("Protokoll exportiert: {}", path);
    Ok(())
}

pub fn handle_import(file: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let text = fs::read_to_string(&file)?;

    let sitzung = if file.ends_with(".json") {
        let sitzung = parse_json(&text)?;
        store.import_sitzung(sitzung.clone())?;
        sitzung
    } else {
        let data = parse_protocol_text(&text);
        store.create_sitzung(data)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&sitzung)?);
    } else {
        println!(
            "Sitzungsdaten geladen ({}) - {} ({} Teilnehmer, {} TOPs)",
            short(&sitzung.id),
            if sitzung.data.title.is_empty() {
                "ohne Titel"
            } else {
                sitzung.data.title.as_str()
            },
            sitzung.data.participants.len(),
            sitzung.data.agenda_items.len()
        );
    }
    Ok(())
}

// --- Templates ------------------------------------------------------------

pub fn handle_template_list(json: bool) -> Result<()> {
    let store = open_store()?;
    let templates = store.list_templates();

    if json {
        println!("{}", serde_json::to_string_pretty(&templates)?);
    } else {
        println!("Vorlagen:\n");
        for t in templates {
            println!("  {} - {} ({} TOPs)", t.id, t.name, t.agenda_items.len());
        }
    }
    Ok(())
}

pub fn handle_template_show(id: String) -> Result<()> {
    let store = open_store()?;
    let template = store
        .get_template(&id)
        .ok_or_else(|| ProtokollError::EntityNotFound(format!("Vorlage {}", id)))?;

    println!("{} - {}", template.id, template.name);
    if !template.description.is_empty() {
        println!("{}", template.description);
    }
    println!();
    for (index, item) in template.agenda_items.iter().enumerate() {
        println!(
            "  TOP {}: {}{}",
            index + 1,
            item.title,
            if item.voting_result.is_some() {
                " (Abstimmung)"
            } else {
                ""
            }
        );
    }
    Ok(())
}

pub fn handle_template_add(
    id: String,
    name: String,
    from: String,
    description: String,
) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &from)?;

    require_non_empty(&id, "Vorlagen-Id")?;
    require_non_empty(&name, "Name")?;

    let agenda_items = sitzung
        .data
        .agenda_items
        .iter()
        .map(|item| TemplateAgendaItem {
            title: item.title.clone(),
            voting_result: item.voting_result.map(|_| VotingResult::default()),
        })
        .collect();

    store.add_template(SitzungTemplate {
        id: id.clone(),
        name,
        description,
        agenda_items,
        roles: None,
    })?;

    println!("Vorlage '{}' gespeichert", id);
    Ok(())
}

pub fn handle_template_delete(id: String) -> Result<()> {
    let store = open_store()?;
    store.delete_template(&id)?;
    println!("Vorlage '{}' gelöscht", id);
    Ok(())
}

// --- Settings / Invite ----------------------------------------------------

pub fn handle_settings_show(json: bool) -> Result<()> {
    let store = open_store()?;

    match store.email_settings() {
        Some(settings) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("Absender: {} <{}>", settings.sender_name, settings.sender_email);
                println!("Sammler-Adresse: {}", settings.collector_email);
            }
        }
        None => println!("Keine E-Mail-Einstellungen konfiguriert."),
    }
    Ok(())
}

pub fn handle_settings_set_email(
    sender_email: String,
    sender_name: String,
    collector_email: String,
) -> Result<()> {
    let store = open_store()?;
    let settings = EmailSettings::new(sender_email, sender_name, collector_email)?;
    store.set_email_settings(&settings)?;

    println!("E-Mail-Einstellungen gespeichert");
    Ok(())
}

pub fn handle_invite(sitzung: String) -> Result<()> {
    let store = open_store()?;
    let sitzung = resolve_sitzung(&store, &sitzung)?;

    let settings = store.email_settings().ok_or_else(|| {
        ProtokollError::Validation("E-Mail-Einstellungen nicht konfiguriert".to_string())
    })?;

    let uri = email::compose_invitation(&sitzung.data, &settings)?;
    println!("{}", uri);
    Ok(())
}
