use std::fmt;

use rayon::ThreadPool;
use sampling::source::Source;
use tracing::{debug, info, info_span};

use crate::{
    BinaryVector, Corpus, EncryptedQuery, FeatureEncoder, PipelineConfig, Querier, Ranking, Result,
    ScoredEntry, Scorer, SearchError, rank,
};

/// Phases of one query, in order. A query moves strictly forward and
/// stops at the first failing phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryPhase {
    Encoding,
    Encrypting,
    ScatterScoring,
    GatherDecrypt,
    Ranked,
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            QueryPhase::Encoding => "encoding",
            QueryPhase::Encrypting => "encrypting",
            QueryPhase::ScatterScoring => "scatter-scoring",
            QueryPhase::GatherDecrypt => "gather-decrypt",
            QueryPhase::Ranked => "ranked",
        };
        f.write_str(name)
    }
}

/// Runs queries end to end against one corpus: encode, encrypt, score
/// every entry, decrypt and rank. Querier and scorer are run in-process
/// and only exchange an [EncryptedQuery] and the scorer's response.
///
/// The parallel phases run on a dedicated pool sized by
/// [crate::ParallelismConfig].
pub struct ScoringPipeline<'a, P, E> {
    config: PipelineConfig,
    corpus: &'a Corpus<P>,
    encoder: E,
    querier: Querier,
    scorer_source: Source,
    pool: ThreadPool,
    phase: Option<QueryPhase>,
}

impl<'a, P, E> ScoringPipeline<'a, P, E>
where
    P: Clone + Send + Sync,
    E: FeatureEncoder,
{
    /// Instantiates a new [ScoringPipeline].
    ///
    /// # Arguments
    ///
    /// * `config`: pipeline settings.
    /// * `corpus`: the scorer's corpus, its vector length must match `encoder`.
    /// * `encoder`: encodes raw query records.
    /// * `querier`: key holder of the queries.
    /// * `scorer_source`: scorer-side randomness, used for rerandomization.
    pub fn new(
        config: PipelineConfig,
        corpus: &'a Corpus<P>,
        encoder: E,
        querier: Querier,
        scorer_source: Source,
    ) -> Result<Self> {
        if encoder.len() != corpus.vector_len() {
            return Err(SearchError::VectorLengthMismatch {
                expected: corpus.vector_len(),
                actual: encoder.len(),
            });
        }
        Ok(Self {
            config,
            corpus,
            encoder,
            querier,
            scorer_source,
            pool: config.parallelism.thread_pool()?,
            phase: None,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn querier(&self) -> &Querier {
        &self.querier
    }

    /// Phase reached by the last query: [QueryPhase::Ranked] after a
    /// success, the failing phase otherwise.
    pub fn phase(&self) -> Option<QueryPhase> {
        self.phase
    }

    /// Encodes `record` and ranks the corpus against it.
    pub fn search(&mut self, record: &str) -> Result<Ranking<P>> {
        advance(&mut self.phase, QueryPhase::Encoding);
        let query: BinaryVector = self.encoder.encode(record);
        debug!(magnitude = query.magnitude(), "encoded query");
        self.search_vector(&query)
    }

    /// Ranks the corpus against an already encoded query.
    pub fn search_vector(&mut self, query: &BinaryVector) -> Result<Ranking<P>> {
        let span = info_span!("query", entries = self.corpus.len(), len = query.len());
        let _enter = span.enter();

        advance(&mut self.phase, QueryPhase::Encrypting);
        let pool: &ThreadPool = &self.pool;
        let querier: &mut Querier = &mut self.querier;
        let encrypted: EncryptedQuery = pool.install(|| querier.encrypt_query(query))?;

        advance(&mut self.phase, QueryPhase::ScatterScoring);
        let scorer: Scorer<P> = Scorer::new(self.corpus).with_rerandomize(self.config.rerandomize);
        let query_magnitude: u64 = query.magnitude() as u64;
        let scorer_source: &mut Source = &mut self.scorer_source;
        let querier: &Querier = &self.querier;
        let scored: Vec<ScoredEntry<P>> = if self.config.response_packing {
            let response = pool.install(|| scorer.score_packed(&encrypted, scorer_source))?;
            advance(&mut self.phase, QueryPhase::GatherDecrypt);
            pool.install(|| querier.gather_packed(response, query_magnitude))?
        } else {
            let response = pool.install(|| scorer.score(&encrypted, scorer_source))?;
            advance(&mut self.phase, QueryPhase::GatherDecrypt);
            pool.install(|| querier.gather(response, query_magnitude))?
        };

        let ranking: Ranking<P> = rank(scored, self.config.top_k, self.config.tie_break);
        advance(&mut self.phase, QueryPhase::Ranked);
        match ranking.best() {
            Some(best) => info!(
                id = best.id,
                iou = best.score.iou(),
                intersection = best.score.intersection,
                "best match"
            ),
            None => info!("empty corpus"),
        }
        Ok(ranking)
    }
}

fn advance(phase: &mut Option<QueryPhase>, next: QueryPhase) {
    debug!(from = ?phase, to = %next, "query phase");
    *phase = Some(next);
}
