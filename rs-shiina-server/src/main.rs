mod config;

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{get, middleware, post, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};

use rs_shiina_core::ShiinaError;
use rs_shiina_core::corpus::CorpusFile;
use rs_shiina_core::model::filter::MorphemeFilter;
use rs_shiina_core::model::generation_input::{GenerationInput, GenerationMode};
use rs_shiina_core::model::generator::Generator;
use rs_shiina_core::model::morpheme::Morpheme;
use rs_shiina_core::model::propers::{detect_propers, ProperNoun};

use config::Config;

/// Payload carrying one or several tokenized sentences.
#[derive(Deserialize)]
struct SentencesBody {
	tokenized: Option<Vec<Morpheme>>,
	sentences: Option<Vec<Vec<Morpheme>>>,
}

impl SentencesBody {
	/// All non-empty sentences of the payload, `tokenized` first.
	fn into_sentences(self) -> Vec<Vec<Morpheme>> {
		self.tokenized
			.into_iter()
			.chain(self.sentences.unwrap_or_default())
			.filter(|sentence| !sentence.is_empty())
			.collect()
	}
}

/// Body of `/api/generate`
#[derive(Deserialize)]
struct GenerateBody {
	text: Option<String>,
	structure: Option<Vec<Morpheme>>,
	mode: Option<GenerationMode>,
	max_tokens: Option<usize>,
}

/// Body of `/api/next`
#[derive(Deserialize)]
struct NextBody {
	text: Option<String>,
	tag: Option<String>,
}

#[derive(Serialize)]
struct Failure<'a> {
	state: &'static str,
	error: &'a str,
}

#[derive(Serialize)]
struct RegisterReply {
	state: &'static str,
	registered: usize,
}

#[derive(Serialize)]
struct GenerateReply {
	state: &'static str,
	text: String,
	tokens: usize,
}

#[derive(Serialize)]
struct NextReply {
	state: &'static str,
	word: Option<Morpheme>,
}

#[derive(Serialize)]
struct Stats {
	sentences: usize,
	vocabulary: usize,
	structures: usize,
	adjacency: usize,
}

struct SharedData {
	generator: Generator,
	corpus: CorpusFile,
	max_tokens: usize,
}

fn failure(status: StatusCode, message: &str) -> HttpResponse {
	HttpResponse::build(status).json(Failure { state: "failure", error: message })
}

/// Maps a core error to 400 for bad input and 500 otherwise.
fn error_response(e: &ShiinaError) -> HttpResponse {
	if e.is_invalid_input() {
		failure(StatusCode::BAD_REQUEST, &e.to_string())
	} else {
		error!("{e}");
		failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
	}
}

fn lock_failed() -> HttpResponse {
	failure(StatusCode::INTERNAL_SERVER_ERROR, "Generator lock failed")
}

/// HTTP POST endpoint `/api/register`
///
/// Stores the sentences in the corpus, then learns them.
#[post("/api/register")]
async fn post_register(data: web::Data<Mutex<SharedData>>, body: web::Json<SentencesBody>) -> impl Responder {
	let sentences = body.into_inner().into_sentences();
	if sentences.is_empty() {
		return failure(StatusCode::BAD_REQUEST, "'tokenized' or 'sentences' must contain morphemes.");
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return lock_failed(),
	};

	if let Err(e) = shared_data.corpus.append_all(sentences.iter().map(Vec::as_slice)) {
		return error_response(&e);
	}
	let registered = shared_data.generator.import(&sentences);

	HttpResponse::Ok().json(RegisterReply { state: "success", registered })
}

/// HTTP POST endpoint `/api/generate`
///
/// Synthesizes one sentence. Every field of the body is optional.
#[post("/api/generate")]
async fn post_generate(data: web::Data<Mutex<SharedData>>, body: web::Json<GenerateBody>) -> impl Responder {
	let body = body.into_inner();

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return lock_failed(),
	};

	let mut input = GenerationInput::new()
		.with_seed(body.text.as_deref().unwrap_or_default())
		.with_mode(body.mode.unwrap_or_default());
	input.skeleton = body.structure;
	if let Err(e) = input.set_max_tokens(body.max_tokens.unwrap_or(shared_data.max_tokens)) {
		return error_response(&e);
	}

	match shared_data.generator.generate_with(&input) {
		Ok(generated) => HttpResponse::Ok().json(GenerateReply {
			state: "success",
			tokens: generated.tokens.len(),
			text: generated.text,
		}),
		Err(e) => error_response(&e),
	}
}

/// HTTP POST endpoint `/api/next`
///
/// Returns a plausible successor of `text`, or `null`.
#[post("/api/next")]
async fn post_next(data: web::Data<Mutex<SharedData>>, body: web::Json<NextBody>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return lock_failed(),
	};

	let word = body.text.as_deref().unwrap_or_default();
	match shared_data.generator.next(word, body.tag.as_deref()) {
		Ok(next) => HttpResponse::Ok().json(NextReply { state: "success", word: next }),
		Err(e) => error_response(&e),
	}
}

/// HTTP GET endpoint `/api/vocabulary`
///
/// Query parameters are morpheme attributes, e.g. `?pos=名詞&pos_detail_1=接尾`.
#[get("/api/vocabulary")]
async fn get_vocabulary(data: web::Data<Mutex<SharedData>>, query: web::Query<HashMap<String, String>>) -> impl Responder {
	let filter = match MorphemeFilter::from_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str()))) {
		Ok(filter) => filter,
		Err(e) => return error_response(&e),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return lock_failed(),
	};
	let words: Vec<&Morpheme> = shared_data.generator.dictionary().vocabulary().filter(&filter);
	HttpResponse::Ok().json(words)
}

/// HTTP POST endpoint `/api/propers`
///
/// Detects compound proper nouns, each word reported once.
#[post("/api/propers")]
async fn post_propers(body: web::Json<SentencesBody>) -> impl Responder {
	let mut seen = HashSet::new();
	let propers: Vec<ProperNoun> = body
		.into_inner()
		.into_sentences()
		.iter()
		.flat_map(|sentence| detect_propers(sentence))
		.filter(|proper| seen.insert(proper.word.clone()))
		.collect();

	HttpResponse::Ok().json(propers)
}

#[get("/api/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return lock_failed(),
	};
	let dictionary = shared_data.generator.dictionary();

	HttpResponse::Ok().json(Stats {
		sentences: dictionary.len(),
		vocabulary: dictionary.vocabulary().len(),
		structures: dictionary.structures().len(),
		adjacency: dictionary.adjacency().len(),
	})
}

fn app_config(cfg: &mut web::ServiceConfig) {
	cfg.service(post_register)
		.service(post_generate)
		.service(post_next)
		.service(get_vocabulary)
		.service(post_propers)
		.service(get_stats);
}

/// Main entry point for the server.
///
/// Loads the corpus named by the configuration, learns it, wraps the
/// generator in a `Mutex` and serves the JSON API.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Config::from_env().map_err(std::io::Error::other)?;

	let corpus = CorpusFile::open(&config.corpus_path).map_err(std::io::Error::other)?;
	let generator = Generator::from_corpus(&corpus).map_err(std::io::Error::other)?;
	info!("Learned {} sentences from {}", generator.dictionary().len(), corpus.path().display());

	let shared_data = SharedData {
		generator,
		corpus,
		max_tokens: config.max_tokens,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("Listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.configure(app_config)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::test;
	use serde_json::{json, Value};

	fn shared(name: &str) -> web::Data<Mutex<SharedData>> {
		let path = std::env::temp_dir().join(format!("rs-shiina-server-{}-{name}.jsonl", std::process::id()));
		let _ = std::fs::remove_file(&path);
		let corpus = CorpusFile::open(&path).unwrap();
		web::Data::new(Mutex::new(SharedData { generator: Generator::new(), corpus, max_tokens: 200 }))
	}

	fn sentence() -> Value {
		json!([
			{"surface_form": "猫", "pos": "名詞", "pos_detail_1": "一般"},
			{"surface_form": "が", "pos": "助詞", "pos_detail_1": "格助詞"},
			{"surface_form": "鳴く", "pos": "動詞", "pos_detail_1": "自立", "conjugated_form": "基本形"}
		])
	}

	#[actix_web::test]
	async fn test_register_then_generate() {
		let data = shared("generate");
		let app = test::init_service(App::new().app_data(data.clone()).configure(app_config)).await;

		let req = test::TestRequest::post().uri("/api/register").set_json(json!({ "tokenized": sentence() })).to_request();
		let reply: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(reply["state"], "success");
		assert_eq!(reply["registered"], 1);

		let req = test::TestRequest::post().uri("/api/generate").set_json(json!({})).to_request();
		let reply: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(reply["text"], "猫が鳴く");
		assert_eq!(reply["tokens"], 3);

		let stored = data.lock().unwrap().corpus.read_sentences().unwrap();
		assert_eq!(stored.len(), 1);
	}

	#[actix_web::test]
	async fn test_empty_register_is_rejected() {
		let app = test::init_service(App::new().app_data(shared("empty")).configure(app_config)).await;

		let req = test::TestRequest::post().uri("/api/register").set_json(json!({ "sentences": [[]] })).to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_invalid_input_maps_to_bad_request() {
		let data = shared("invalid");
		data.lock().unwrap().generator.register(&serde_json::from_value::<Vec<Morpheme>>(sentence()).unwrap());
		let app = test::init_service(App::new().app_data(data).configure(app_config)).await;

		let req = test::TestRequest::get().uri("/api/vocabulary?color=red").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::post().uri("/api/next").set_json(json!({ "text": "猫", "tag": "形容詞" })).to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::post().uri("/api/generate").set_json(json!({ "max_tokens": 0 })).to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::post()
			.uri("/api/generate")
			.set_json(json!({ "structure": [{ "surface_form": "x" }] }))
			.to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/api/vocabulary").to_request();
		let words: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(words.as_array().map(Vec::len), Some(3));
	}

	#[actix_web::test]
	async fn test_propers_are_reported_once() {
		let app = test::init_service(App::new().configure(app_config)).await;

		let compound = json!([
			{"surface_form": "東京", "pos": "名詞", "pos_detail_1": "固有名詞"},
			{"surface_form": "都", "pos": "名詞", "pos_detail_1": "接尾"},
			{"surface_form": "に", "pos": "助詞", "pos_detail_1": "格助詞"}
		]);
		let req = test::TestRequest::post()
			.uri("/api/propers")
			.set_json(json!({ "tokenized": compound.clone(), "sentences": [compound] }))
			.to_request();
		let reply: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(reply, json!([{ "kind": "suffix_bounded", "word": "東京都" }]));
	}
}
