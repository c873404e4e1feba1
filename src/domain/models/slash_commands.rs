#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    rest: String,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let (prefix, rest) = match text.split_once(char::is_whitespace) {
            Some((prefix, rest)) => (prefix, rest.trim_start()),
            None => (text, ""),
        };

        let cmd = SlashCommand {
            command: prefix.to_string(),
            rest: rest.to_string(),
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_attach()
            || cmd.is_detach()
            || cmd.is_prompt_list()
            || cmd.is_prompt_set()
            || cmd.is_model_list()
            || cmd.is_model_set()
            || cmd.is_new_session()
            || cmd.is_session()
            || cmd.is_export()
        {
            return Some(cmd);
        }

        return None;
    }

    /// Everything after the command token as typed, for values that may
    /// contain spaces such as file paths.
    pub fn arg_text(&self) -> String {
        return self.rest.to_string();
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_attach(&self) -> bool {
        return ["/a", "/attach"].contains(&self.command.as_str());
    }

    pub fn is_detach(&self) -> bool {
        return ["/d", "/detach"].contains(&self.command.as_str());
    }

    pub fn is_prompt_list(&self) -> bool {
        return ["/pl", "/prompts"].contains(&self.command.as_str());
    }

    pub fn is_prompt_set(&self) -> bool {
        return ["/p", "/prompt"].contains(&self.command.as_str());
    }

    pub fn is_model_list(&self) -> bool {
        return ["/ml", "/models", "/modellist"].contains(&self.command.as_str());
    }

    pub fn is_model_set(&self) -> bool {
        return ["/m", "/model"].contains(&self.command.as_str());
    }

    pub fn is_new_session(&self) -> bool {
        return ["/n", "/new"].contains(&self.command.as_str());
    }

    pub fn is_session(&self) -> bool {
        return ["/s", "/session"].contains(&self.command.as_str());
    }

    pub fn is_export(&self) -> bool {
        return ["/e", "/export"].contains(&self.command.as_str());
    }
}
