use wtkit::styling::println;

use crate::cli::Shell;

const POSIX_FUNCTION: &str = r#"wk() {
  local cd_target=0
  case "$1" in
    switch|create|checkout|time-travel) cd_target=1 ;;
    tag) [[ "$2" == "switch" ]] && cd_target=1 ;;
  esac

  if [[ $cd_target -eq 1 ]]; then
    for arg in "$@"; do
      if [[ "$arg" == "-h" || "$arg" == "--help" ]]; then
        command wk "$@"
        return $?
      fi
    done

    local target
    target="$(command wk "$@")" || return $?
    [[ -n "$target" ]] || return 1
    builtin cd -- "$target" || return $?
  else
    command wk "$@"
  fi
}"#;

const FISH_FUNCTION: &str = r#"function wk --wraps wk --description 'wk wrapper that cds into resolved worktrees'
    set -l cd_target 0
    if test (count $argv) -ge 1
        switch $argv[1]
            case switch create checkout time-travel
                set cd_target 1
            case tag
                if test (count $argv) -ge 2; and test "$argv[2]" = "switch"
                    set cd_target 1
                end
        end
    end

    if test $cd_target -eq 0
        command wk $argv
        return $status
    end

    for arg in $argv
        if test "$arg" = "-h" -o "$arg" = "--help"
            command wk $argv
            return $status
        end
    end

    set -l target (command wk $argv | string collect)
    or return $status
    if test -z "$target"
        return 1
    end
    cd -- "$target"
end"#;

/// Shell function wrapping `wk` so that directory-changing commands `cd`.
pub fn shell_init_snippet(shell: Shell) -> String {
    let (name, usage, body) = match shell {
        Shell::Bash => ("bash", r#"eval "$(wk shell-init bash)""#, POSIX_FUNCTION),
        Shell::Zsh => ("zsh", r#"eval "$(wk shell-init zsh)""#, POSIX_FUNCTION),
        Shell::Fish => ("fish", "wk shell-init fish | source", FISH_FUNCTION),
    };
    format!(
        "# wk shell integration ({name})
#
# Usage:
#   {usage}
#
# Notes:
# - Only takes effect with on-enter = \"print\" (the default).
# - Use `command wk ...` to bypass the function (call the binary directly).

{body}"
    )
}

pub fn handle_shell_init(shell: Shell) -> anyhow::Result<()> {
    println!("{}", shell_init_snippet(shell));
    Ok(())
}
