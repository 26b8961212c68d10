use polling_app::domain::{OptionId, PollId, Registration, RoleId, Route, Session};
use polling_app::AppContext;
use polling_errors::AppError;

use crate::edit_args::apply_changes;
use crate::{render, AccountArgs, Commands};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}", .0.user_message())]
    App(#[from] AppError),

    #[error("{requested} needs a signed-in account, run `polling login` first")]
    SignInRequired { requested: Route },

    #[error("{requested} is not available, redirected to {to}")]
    Redirected { requested: Route, to: Route },

    #[error("{0}")]
    Usage(String),
}

/// Opens `route` through the guard, failing when it redirects elsewhere.
fn open(ctx: &AppContext, route: Route) -> Result<(), CliError> {
    let reached = ctx.guard.navigate(route.clone());
    if reached == route {
        return Ok(());
    }
    if reached == Route::Login {
        Err(CliError::SignInRequired { requested: route })
    } else {
        Err(CliError::Redirected {
            requested: route,
            to: reached,
        })
    }
}

fn current_session(ctx: &AppContext) -> Result<Session, CliError> {
    ctx.auth.session().ok_or(CliError::SignInRequired {
        requested: Route::Polls,
    })
}

/// Roles are listed on the signup form and on the create-user form.
fn roles_view(is_authenticated: bool) -> Route {
    if is_authenticated {
        Route::CreateUser
    } else {
        Route::Signup
    }
}

fn registration(args: AccountArgs) -> Registration {
    Registration {
        confirm_password: args
            .confirm_password
            .unwrap_or_else(|| args.password.clone()),
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password: args.password,
        role_id: Some(RoleId(args.role)),
    }
}

pub(crate) async fn run(ctx: &AppContext, command: Commands, json: bool) -> Result<(), CliError> {
    match command {
        Commands::Login { email, password } => {
            open(ctx, Route::Login)?;
            let session = ctx.auth.login(&email, &password).await?;
            render::session(&session);
        }
        Commands::Signup(args) => {
            open(ctx, Route::Signup)?;
            let session = ctx.auth.signup(&registration(args)).await?;
            render::session(&session);
        }
        Commands::Logout => {
            ctx.auth.logout();
            println!("Signed out");
        }
        Commands::Whoami => {
            let session = current_session(ctx)?;
            if json {
                render::json(&session).map_err(CliError::Usage)?;
            } else {
                render::session(&session);
            }
        }
        Commands::Roles => {
            open(ctx, roles_view(ctx.auth.is_authenticated()))?;
            let roles = ctx.auth.fetch_roles().await?;
            if json {
                render::json(&roles).map_err(CliError::Usage)?;
            } else {
                render::roles(&roles);
            }
        }
        Commands::Polls { pages } => {
            open(ctx, Route::Polls)?;
            let session = current_session(ctx)?;
            ctx.polls.fetch_polls(1).await?;
            while ctx.polls.current_page() < pages && ctx.polls.load_more().await? {}

            let polls = ctx.polls.polls();
            if json {
                render::json(&polls).map_err(CliError::Usage)?;
            } else {
                for poll in &polls {
                    let voted = ctx.polls.voted_option(poll.id, session.user_id);
                    println!("{}", render::poll_line(poll, voted));
                }
                if ctx.polls.has_more() {
                    println!("(more polls available, use --pages)");
                }
            }
        }
        Commands::Poll { poll_id } => {
            open(ctx, Route::Polls)?;
            let session = current_session(ctx)?;
            let poll = ctx.polls.fetch_poll_details(PollId(poll_id)).await?;
            if json {
                render::json(&poll).map_err(CliError::Usage)?;
            } else {
                render::poll_details(&poll, ctx.polls.voted_option(poll.id, session.user_id));
            }
        }
        Commands::Vote { poll_id, option_id } => {
            open(ctx, Route::Polls)?;
            let session = current_session(ctx)?;
            let (poll_id, option_id) = (PollId(poll_id), OptionId(option_id));
            if ctx.polls.has_voted(poll_id, session.user_id) {
                return Err(CliError::Usage(format!(
                    "You have already voted on poll {poll_id}"
                )));
            }
            ctx.polls
                .save_vote(poll_id, option_id, session.user_id)
                .await?;
            render::results(&ctx.polls.poll_results(poll_id).await?);
        }
        Commands::Results { poll_id } => {
            open(ctx, Route::Polls)?;
            let results = ctx.polls.poll_results(PollId(poll_id)).await?;
            render::results(&results);
        }
        Commands::AddPoll { title, options } => {
            open(ctx, Route::AddPoll)?;
            let poll = ctx.polls.add_poll(&title, &options).await?;
            render::poll_details(&poll, None);
        }
        Commands::EditPoll {
            poll_id,
            title,
            renames,
            removals,
            additions,
        } => {
            let poll_id = PollId(poll_id);
            open(ctx, Route::EditPoll(poll_id))?;
            let editor = ctx.poll_editor();
            let mut edit = editor.begin(poll_id).await?;
            apply_changes(&mut edit, title, &renames, &removals, &additions)
                .map_err(CliError::Usage)?;
            let saved = editor.apply(&edit).await?;
            render::poll_details(&saved, None);
        }
        Commands::DeletePoll { poll_id } => {
            open(ctx, Route::Polls)?;
            if !current_session(ctx)?.is_admin() {
                return Err(CliError::Usage("Only administrators can delete polls".into()));
            }
            ctx.polls.delete_poll(PollId(poll_id)).await?;
            println!("Deleted poll {poll_id}");
        }
        Commands::Users { page, size } => {
            open(ctx, Route::ListUsers)?;
            let size = size.unwrap_or_else(|| ctx.users.page_size());
            ctx.users.fetch_users(1, size).await?;
            while ctx.users.current_page() < page && ctx.users.load_more().await? {}
            // Role names are best effort.
            if let Err(e) = ctx.users.fetch_roles().await {
                tracing::warn!("Could not load roles: {}", e);
            }

            if json {
                render::json(&ctx.users.users()).map_err(CliError::Usage)?;
            } else {
                render::users(&ctx.users.rows_with_roles());
                if let (Some(total), Some(pages)) =
                    (ctx.users.total_count(), ctx.users.total_pages())
                {
                    println!(
                        "page {} of {}, {} users",
                        ctx.users.current_page(),
                        pages,
                        total
                    );
                }
            }
        }
        Commands::CreateUser(args) => {
            open(ctx, Route::CreateUser)?;
            let user = ctx.users.create_user(&registration(args)).await?;
            println!("Created user {} <{}>", user.id, user.email);
        }
        Commands::Route { path } => {
            let requested = Route::parse(&path);
            let reached = ctx.guard.navigate(requested.clone());
            if reached == requested {
                println!("{requested}");
            } else {
                println!("{requested} -> {reached}");
            }
        }
    }
    Ok(())
}
