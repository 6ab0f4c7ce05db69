use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use photogram_client::{
    AuthResponse, PhotoUpload, PhotogramClient, PhotogramClientError, Post, PostDetail,
    PostSummary,
};

const TOKEN_FILE: &str = ".photogram_token";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "photogram-cli", version, about = "CLI клиент для photogram-server")]
struct Cli {
    /// Адрес сервера; по умолчанию `PHOTOGRAM_SERVER` или локальный HTTP.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: сохранённый токен удаляется.
    Logout,
    /// Лента публикаций.
    List {
        /// Подстрока имени автора или подписи.
        #[arg(long)]
        search: Option<String>,
    },
    /// Публикация с комментариями.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Скачать фотографию публикации.
    Photo {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Создание публикации (требует токен).
    Create {
        #[arg(long)]
        caption: Option<String>,
        /// JPEG-файл.
        #[arg(long)]
        photo: PathBuf,
    },
    /// Замена записи публикации.
    ///
    /// Дата и автор берутся из текущей публикации. Имя файла фотографии
    /// нужно передать явно, иначе будет показываться заглушка.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        image_file_name: Option<String>,
        #[arg(long)]
        image_content_type: Option<String>,
    },
    /// Удаление публикации.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var("PHOTOGRAM_SERVER").ok());
    let mut client = PhotogramClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token().context("не удалось прочитать .photogram_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            user_name,
            name,
            password,
        } => {
            let auth = client
                .register(&user_name, &name, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Регистрация успешна", &auth);
        }
        Command::Login {
            user_name,
            password,
        } => {
            let auth = client
                .login(&user_name, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Вход выполнен", &auth);
        }
        Command::Logout => {
            client.logout().await.map_err(map_client_error)?;
            forget_token().context("не удалось удалить токен")?;
            println!("Выход выполнен");
        }
        Command::List { search } => {
            let posts = client
                .list_posts(search.as_deref())
                .await
                .map_err(map_client_error)?;
            print_list(&posts);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_detail(&post);
        }
        Command::Photo { id, out } => {
            let bytes = client.get_photo(id).await.map_err(map_client_error)?;
            fs::write(&out, &bytes)
                .with_context(|| format!("не удалось записать {}", out.display()))?;
            println!("Фотография сохранена: {} ({} байт)", out.display(), bytes.len());
        }
        Command::Create { caption, photo } => {
            let upload = read_photo(&photo)?;
            let post = client
                .create_post(caption.as_deref(), upload)
                .await
                .map_err(map_client_error)?;
            println!("Публикация создана: id={}", post.id);
            println!("image_file_name: {}", post.image_file_name.unwrap_or_default());
        }
        Command::Update {
            id,
            caption,
            image_file_name,
            image_content_type,
        } => {
            let current = client.get_post(id).await.map_err(map_client_error)?;
            let post = Post {
                id,
                caption,
                posted_at: current.posted_at,
                user_id: current.user.id,
                image_file_name,
                image_content_type,
            };
            client.update_post(&post).await.map_err(map_client_error)?;
            println!("Публикация обновлена: id={id}");
        }
        Command::Delete { id } => {
            let post = client.delete_post(id).await.map_err(map_client_error)?;
            println!("Публикация удалена: id={}", post.id);
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn read_photo(path: &Path) -> Result<PhotoUpload> {
    let bytes =
        fs::read(path).with_context(|| format!("не удалось прочитать {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("некорректное имя файла: {}", path.display()))?
        .to_string();

    Ok(PhotoUpload {
        content_type: guess_content_type(path),
        file_name,
        bytes,
    })
}

fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &PhotogramClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn forget_token() -> io::Result<()> {
    match fs::remove_file(TOKEN_FILE) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn map_client_error(err: PhotogramClientError) -> anyhow::Error {
    let message = match err {
        PhotogramClientError::Unauthorized => {
            "неверные учётные данные: выполните `photogram-cli login ...` или `photogram-cli register ...`"
                .to_string()
        }
        PhotogramClientError::NotFound(message) => format!("не найдено: {message}"),
        PhotogramClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        PhotogramClientError::Server(message) => format!("ошибка сервера: {message}"),
        PhotogramClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("token: {}", auth.access_token);
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  user_name: {}", auth.user.user_name);
    println!("  name: {}", auth.user.name);
}

fn print_detail(post: &PostDetail) {
    println!("id: {}", post.id);
    println!("caption: {}", post.caption.as_deref().unwrap_or(""));
    println!("posted_at: {}", post.posted_at);
    println!("author: {} (@{})", post.user.name, post.user.user_name);
    println!("likes: {}", post.likes);
    println!("comments: {}", post.comments.len());
    for comment in &post.comments {
        println!("  - {} [{}]: {}", comment.name, comment.posted_at, comment.text);
    }
}

fn print_list(posts: &[PostSummary]) {
    println!("Публикаций: {}", posts.len());

    for post in posts {
        println!(
            "- [{}] {} by {} (likes={}, comments={})",
            post.id,
            post.caption.as_deref().unwrap_or("<без подписи>"),
            post.user.name,
            post.likes,
            post.comments
        );
    }
}
