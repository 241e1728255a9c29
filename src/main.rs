use clap::Parser;
use protokoll::cli::{
    handle_antrag_add, handle_antrag_input, handle_antrag_list, handle_antrag_vote,
    handle_dokument_add, handle_dokument_list, handle_dokument_remove, handle_export,
    handle_import, handle_init, handle_invite, handle_rolle_add, handle_rolle_list,
    handle_rolle_remove, handle_rolle_rename, handle_session, handle_settings_set_email,
    handle_settings_show, handle_sitzung_add, handle_sitzung_delete, handle_sitzung_get,
    handle_sitzung_list, handle_sitzung_status, handle_sitzung_update, handle_snapshot_clear,
    handle_snapshot_create, handle_snapshot_delete, handle_snapshot_list,
    handle_snapshot_restore, handle_teilnehmer_add,
    handle_teilnehmer_list, handle_teilnehmer_remove, handle_teilnehmer_toggle,
    handle_template_add, handle_template_delete, handle_template_list, handle_template_show,
    handle_top_add, handle_top_attach, handle_top_complete, handle_top_list, handle_top_note,
    handle_top_remove, handle_top_vote, handle_zeiten_close, handle_zeiten_open,
    handle_zeiten_pause, handle_zeiten_resume, handle_zeiten_show, AntragAction, Cli, Commands,
    DokumentAction, RolleAction, SettingsAction, SitzungAction, SnapshotAction, TeilnehmerAction,
    TemplateAction, TopAction, ZeitenAction,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Sitzung(cmd) => match cmd.action {
            SitzungAction::Add {
                title,
                date,
                time,
                template,
                json,
            } => handle_sitzung_add(title, date, time, template, json),
            SitzungAction::List { json } => handle_sitzung_list(json),
            SitzungAction::Get { id, json } => handle_sitzung_get(id, json),
            SitzungAction::Update {
                id,
                title,
                date,
                time,
                status,
                next_meeting,
                json,
            } => handle_sitzung_update(id, title, date, time, status, next_meeting, json),
            SitzungAction::Delete { id, force } => handle_sitzung_delete(id, force),
            SitzungAction::Status { id, json } => handle_sitzung_status(id, json),
        },
        Commands::Teilnehmer(cmd) => match cmd.action {
            TeilnehmerAction::Add {
                sitzung,
                name,
                role,
            } => handle_teilnehmer_add(sitzung, name, role),
            TeilnehmerAction::Toggle { sitzung, id } => handle_teilnehmer_toggle(sitzung, id),
            TeilnehmerAction::Remove { sitzung, id } => handle_teilnehmer_remove(sitzung, id),
            TeilnehmerAction::List { sitzung, json } => handle_teilnehmer_list(sitzung, json),
        },
        Commands::Rolle(cmd) => match cmd.action {
            RolleAction::Add {
                sitzung,
                name,
                color,
            } => handle_rolle_add(sitzung, name, color),
            RolleAction::Rename { sitzung, id, name } => handle_rolle_rename(sitzung, id, name),
            RolleAction::Remove { sitzung, id } => handle_rolle_remove(sitzung, id),
            RolleAction::List { sitzung, json } => handle_rolle_list(sitzung, json),
        },
        Commands::Top(cmd) => match cmd.action {
            TopAction::Add {
                sitzung,
                title,
                antraege_section,
            } => handle_top_add(sitzung, title, antraege_section),
            TopAction::Vote {
                sitzung,
                number,
                ja,
                nein,
                enthaltungen,
            } => handle_top_vote(sitzung, number, ja, nein, enthaltungen),
            TopAction::Note {
                sitzung,
                number,
                text,
            } => handle_top_note(sitzung, number, text),
            TopAction::Complete { sitzung, number } => handle_top_complete(sitzung, number),
            TopAction::Attach {
                sitzung,
                number,
                document,
            } => handle_top_attach(sitzung, number, document),
            TopAction::Remove { sitzung, number } => handle_top_remove(sitzung, number),
            TopAction::List { sitzung, json } => handle_top_list(sitzung, json),
        },
        Commands::Antrag(cmd) => match cmd.action {
            AntragAction::Add {
                sitzung,
                top,
                title,
                antrag_type,
            } => handle_antrag_add(sitzung, top, title, antrag_type),
            AntragAction::Vote {
                sitzung,
                top,
                number,
                ja,
                nein,
                enthaltungen,
            } => handle_antrag_vote(sitzung, top, number, ja, nein, enthaltungen),
            AntragAction::Input {
                sitzung,
                top,
                number,
                text,
            } => handle_antrag_input(sitzung, top, number, text),
            AntragAction::List { sitzung, top, json } => handle_antrag_list(sitzung, top, json),
        },
        Commands::Zeiten(cmd) => match cmd.action {
            ZeitenAction::Open { sitzung, time } => handle_zeiten_open(sitzung, time),
            ZeitenAction::Pause { sitzung, time } => handle_zeiten_pause(sitzung, time),
            ZeitenAction::Resume { sitzung, time } => handle_zeiten_resume(sitzung, time),
            ZeitenAction::Close { sitzung, time } => handle_zeiten_close(sitzung, time),
            ZeitenAction::Show { sitzung } => handle_zeiten_show(sitzung),
        },
        Commands::Dokument(cmd) => match cmd.action {
            DokumentAction::Add { sitzung, name } => handle_dokument_add(sitzung, name),
            DokumentAction::Remove { sitzung, id } => handle_dokument_remove(sitzung, id),
            DokumentAction::List { sitzung, json } => handle_dokument_list(sitzung, json),
        },
        Commands::Snapshot(cmd) => match cmd.action {
            SnapshotAction::Create { sitzung, label } => handle_snapshot_create(sitzung, label),
            SnapshotAction::List { sitzung, json } => handle_snapshot_list(sitzung, json),
            SnapshotAction::Restore {
                sitzung,
                id,
                no_checkpoint,
            } => handle_snapshot_restore(sitzung, id, no_checkpoint),
            SnapshotAction::Delete { sitzung, id } => handle_snapshot_delete(sitzung, id),
            SnapshotAction::Clear { sitzung } => handle_snapshot_clear(sitzung),
        },
        Commands::Session { sitzung, interval } => handle_session(sitzung, interval),
        Commands::Export {
            sitzung,
            format,
            output,
        } => handle_export(sitzung, format, output),
        Commands::Import { file, json } => handle_import(file, json),
        Commands::Template(cmd) => match cmd.action {
            TemplateAction::List { json } => handle_template_list(json),
            TemplateAction::Show { id } => handle_template_show(id),
            TemplateAction::Add {
                id,
                name,
                from,
                description,
            } => handle_template_add(id, name, from, description),
            TemplateAction::Delete { id } => handle_template_delete(id),
        },
        Commands::Settings(cmd) => match cmd.action {
            SettingsAction::Show { json } => handle_settings_show(json),
            SettingsAction::SetEmail {
                sender_email,
                sender_name,
                collector_email,
            } => handle_settings_set_email(sender_email, sender_name, collector_email),
        },
        Commands::Invite { sitzung } => handle_invite(sitzung),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
