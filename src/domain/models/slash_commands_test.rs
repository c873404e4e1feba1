use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_plain_text() {
    let text = "Hello there /q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_quit() {
    for text in ["/q", "/quit", "/exit"] {
        assert!(SlashCommand::parse(text).unwrap().is_quit());
    }
}
#[test]
fn it_is_not_is_quit() {
    let cmd = SlashCommand::parse("/ml").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_help() {
    assert!(SlashCommand::parse("/h").unwrap().is_help());
    assert!(SlashCommand::parse("/help").unwrap().is_help());
}

#[test]
fn it_is_attach_with_path_containing_spaces() {
    let cmd = SlashCommand::parse("/attach  /tmp/my report.pdf ").unwrap();
    assert!(cmd.is_attach());
    assert_eq!(cmd.arg_text(), "/tmp/my report.pdf");
}

#[test]
fn it_keeps_runs_of_spaces_in_arguments() {
    let cmd = SlashCommand::parse("/a   /tmp/quarterly   report.pdf").unwrap();
    assert!(cmd.is_attach());
    assert_eq!(cmd.arg_text(), "/tmp/quarterly   report.pdf");
}

#[test]
fn it_is_detach() {
    assert!(SlashCommand::parse("/d").unwrap().is_detach());
    assert!(SlashCommand::parse("/detach").unwrap().is_detach());
}

#[test]
fn it_is_prompt_set_and_list() {
    let cmd = SlashCommand::parse("/prompt assistant.txt").unwrap();
    assert!(cmd.is_prompt_set());
    assert!(!cmd.is_prompt_list());
    assert_eq!(cmd.arg_text(), "assistant.txt");

    assert!(SlashCommand::parse("/pl").unwrap().is_prompt_list());
    assert!(SlashCommand::parse("/prompts").unwrap().is_prompt_list());
}

#[test]
fn it_is_model_set_and_list() {
    let cmd = SlashCommand::parse("/m gpt-4o").unwrap();
    assert!(cmd.is_model_set());
    assert_eq!(cmd.arg_text(), "gpt-4o");

    assert!(SlashCommand::parse("/models").unwrap().is_model_list());
    assert!(SlashCommand::parse("/modellist").unwrap().is_model_list());
}

#[test]
fn it_is_new_session() {
    assert!(SlashCommand::parse("/n").unwrap().is_new_session());
    assert!(SlashCommand::parse("/new").unwrap().is_new_session());
}

#[test]
fn it_is_session() {
    assert!(SlashCommand::parse("/s").unwrap().is_session());
    assert!(SlashCommand::parse("/session").unwrap().is_session());
}

#[test]
fn it_is_export() {
    let cmd = SlashCommand::parse("/export markdown").unwrap();
    assert!(cmd.is_export());
    assert_eq!(cmd.arg_text(), "markdown");
}
