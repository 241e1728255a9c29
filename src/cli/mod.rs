mod commands;
mod handlers;

pub use commands::{
    AntragAction, AntragCommand, Cli, Commands, DokumentAction, DokumentCommand, RolleAction,
    RolleCommand, SettingsAction, SettingsCommand, SitzungAction, SitzungCommand, SnapshotAction,
    SnapshotCommand, TeilnehmerAction, TeilnehmerCommand, TemplateAction, TemplateCommand,
    TopAction, TopCommand, ZeitenAction, ZeitenCommand,
};
pub use handlers::{
    handle_antrag_add, handle_antrag_input, handle_antrag_list, handle_antrag_vote,
    handle_dokument_add, handle_dokument_list, handle_dokument_remove, handle_export,
    handle_import, handle_init, handle_invite, handle_rolle_add, handle_rolle_list,
    handle_rolle_remove, handle_rolle_rename, handle_settings_set_email, handle_settings_show,
    handle_session, handle_sitzung_add, handle_sitzung_delete, handle_sitzung_get,
    handle_sitzung_list, handle_sitzung_status, handle_sitzung_update, handle_snapshot_clear,
    handle_snapshot_create, handle_snapshot_delete, handle_snapshot_list, handle_snapshot_restore,
    handle_teilnehmer_add,
    handle_teilnehmer_list, handle_teilnehmer_remove, handle_teilnehmer_toggle,
    handle_template_add, handle_template_delete, handle_template_list, handle_template_show,
    handle_top_add, handle_top_attach, handle_top_complete, handle_top_list, handle_top_note,
    handle_top_remove, handle_top_vote, handle_zeiten_close, handle_zeiten_open,
    handle_zeiten_pause, handle_zeiten_resume, handle_zeiten_show,
};
