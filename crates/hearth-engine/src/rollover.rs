//! The weekly rollover: materialize next week's task instances.
//!
//! One run is a full pass over the template database. Templates first absorb
//! what happened since the last run (completion timestamps, completion
//! notes), then each due template gets an instance per target slot. The only
//! duplicate protection is the existence check here, so a re-run with the
//! same anchor creates nothing.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};

use hearth_core::{ActiveTask, Frequency, PropertyKind, TemplateTask, WeekSlot};
use hearth_store::{DocumentStore, Filter, PropertyDescriptor, Schema};

use crate::adapter::{self, build_value};
use crate::error::EngineError;
use crate::props;
use crate::recurrence::{Reference, is_due, week_slots};
use crate::summary::NoteSummarizer;

/// Database ids a rollover run operates on.
#[derive(Debug, Clone)]
pub struct RolloverConfig {
    pub template_db: String,
    pub active_db: String,
}

/// Counters describing what one rollover run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloverReport {
    /// Templates seen in the template database.
    pub templates: usize,
    /// Templates whose completion timestamp advanced this run.
    pub last_completed_updates: usize,
    /// Instances created.
    pub created: usize,
    /// Slot candidates skipped because an open instance already existed.
    pub skipped: usize,
}

/// Status options counted as finished, resolved from the active schema's
/// "Complete" status group.
#[derive(Debug, Default)]
struct CompletionMarkers {
    option_ids: HashSet<String>,
    option_names: HashSet<String>,
}

impl CompletionMarkers {
    fn from_schema(schema: &Schema) -> Self {
        let Some(descriptor) = schema.get(props::STATUS) else {
            tracing::warn!("active schema has no status property, treating nothing as complete");
            return Self::default();
        };
        let markers = Self::from_descriptor(descriptor);
        if markers.option_ids.is_empty() {
            tracing::warn!("status property has no Complete group, treating nothing as complete");
        }
        markers
    }

    fn from_descriptor(descriptor: &PropertyDescriptor) -> Self {
        let option_ids: HashSet<String> = descriptor
            .complete_option_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        let option_names = option_ids
            .iter()
            .filter_map(|id| descriptor.option_by_id(id))
            .map(|option| option.name.clone())
            .collect();
        Self {
            option_ids,
            option_names,
        }
    }

    /// Id match first; name fallback covers stores that omit option ids on
    /// record payloads.
    fn is_complete(&self, task: &ActiveTask) -> bool {
        task.status.as_ref().is_some_and(|status| {
            status
                .id
                .as_ref()
                .is_some_and(|id| self.option_ids.contains(id))
                || status
                    .name
                    .as_ref()
                    .is_some_and(|name| self.option_names.contains(name))
        })
    }
}

/// Run the weekly rollover against `anchor`.
///
/// # Errors
///
/// Fails on store errors during the template pass and on instance-creation
/// failures. Comment forwarding and summarizer failures are logged and
/// skipped instead.
pub async fn run_weekly_rollover<S, Z>(
    store: &S,
    summarizer: &Z,
    config: &RolloverConfig,
    anchor: DateTime<Utc>,
) -> Result<RolloverReport, EngineError>
where
    S: DocumentStore,
    Z: NoteSummarizer,
{
    tracing::info!(anchor = %anchor, "starting weekly rollover");

    let template_schema = store.retrieve_schema(&config.template_db).await?;
    let records = store.query_all(&config.template_db, None).await?;
    let mut templates = Vec::with_capacity(records.len());
    for record in &records {
        templates.push(adapter::template_from_record(record, &template_schema)?);
    }

    let mut active_schema = store.retrieve_schema(&config.active_db).await?;
    let markers = CompletionMarkers::from_schema(&active_schema);

    let mut report = RolloverReport {
        templates: templates.len(),
        ..RolloverReport::default()
    };

    for template in &mut templates {
        if absorb_completions(store, config, template, &markers).await? {
            report.last_completed_updates += 1;
        }
    }

    sync_option_sets(store, config, &template_schema, &mut active_schema).await?;

    let slots = week_slots(anchor.date_naive());
    tracing::debug!(slots = slots.len(), "planning week slots");

    for template in &templates {
        let (created, skipped) = materialize(
            store,
            summarizer,
            config,
            template,
            &active_schema,
            &markers,
            &slots,
            anchor,
        )
        .await?;
        report.created += created;
        report.skipped += skipped;
    }

    tracing::info!(
        templates = report.templates,
        last_completed_updates = report.last_completed_updates,
        created = report.created,
        skipped = report.skipped,
        "rollover done"
    );
    Ok(report)
}

/// Advance a template's completion timestamp from its finished instances.
///
/// Returns whether the timestamp moved. On a move the finished instance's
/// comments are forwarded to the template first, so the template accumulates
/// the full note history.
async fn absorb_completions<S: DocumentStore>(
    store: &S,
    config: &RolloverConfig,
    template: &mut TemplateTask,
    markers: &CompletionMarkers,
) -> Result<bool, EngineError> {
    let filter = Filter::new().rich_text_equals(props::TEMPLATE_ID, &template.id);
    let records = store.query_all(&config.active_db, Some(&filter)).await?;

    let latest = records
        .iter()
        .map(|record| adapter::active_from_record(record, &Schema::new()))
        .filter(|task| markers.is_complete(task))
        .filter_map(|task| task.completed_date.map(|completed| (task, completed)))
        .max_by_key(|(_, completed)| *completed);

    let Some((instance, completed)) = latest else {
        return Ok(false);
    };
    if template.last_completed.is_some_and(|last| completed <= last) {
        return Ok(false);
    }

    forward_comments(store, &instance.id, &template.id).await;

    let mut properties = serde_json::Map::new();
    properties.insert(
        props::LAST_COMPLETED.to_string(),
        build_value(&PropertyKind::Date, Some(&completed.to_rfc3339())),
    );
    store.update_record(&template.id, properties).await?;
    template.last_completed = Some(completed);

    tracing::info!(
        template_id = %template.id,
        task = template.display_name(),
        completed = %completed,
        "advanced last-completed timestamp"
    );
    Ok(true)
}

/// Copy an instance's comments onto its template. Failures here lose notes,
/// not work, so they only warn.
async fn forward_comments<S: DocumentStore>(store: &S, instance_id: &str, template_id: &str) {
    let comments = match store.list_comments(instance_id).await {
        Ok(comments) => comments,
        Err(error) => {
            tracing::warn!(instance_id, %error, "could not list instance comments");
            return;
        }
    };
    for comment in comments {
        if comment.text.trim().is_empty() {
            continue;
        }
        if let Err(error) = store.create_comment(template_id, &comment.text).await {
            tracing::warn!(template_id, %error, "could not forward comment to template");
        }
    }
}

/// Push missing select/status options from the template schema to the active
/// one, mirroring the writes into the in-memory copy.
async fn sync_option_sets<S: DocumentStore>(
    store: &S,
    config: &RolloverConfig,
    template_schema: &Schema,
    active_schema: &mut Schema,
) -> Result<(), EngineError> {
    for patch in adapter::plan_option_sync(template_schema, active_schema) {
        tracing::info!(
            property = %patch.property,
            options = patch.options.len(),
            "syncing option set to active database"
        );
        store
            .update_schema_options(&config.active_db, &patch.property, &patch.kind, patch.options.clone())
            .await?;
        if let Some(descriptor) = active_schema.get_mut(&patch.property) {
            descriptor.options = patch.options;
        }
    }
    Ok(())
}

/// Create this template's due instances for the planned slots.
#[allow(clippy::too_many_arguments)]
async fn materialize<S, Z>(
    store: &S,
    summarizer: &Z,
    config: &RolloverConfig,
    template: &TemplateTask,
    active_schema: &Schema,
    markers: &CompletionMarkers,
    slots: &BTreeMap<WeekSlot, NaiveDate>,
    anchor: DateTime<Utc>,
) -> Result<(usize, usize), EngineError>
where
    S: DocumentStore,
    Z: NoteSummarizer,
{
    let frequency = template.parsed_frequency();
    if frequency.is_none() {
        tracing::warn!(
            template_id = %template.id,
            task = template.display_name(),
            frequency = template.frequency.as_deref().unwrap_or(""),
            "unrecognized frequency, treating as always due"
        );
    }

    let candidates: Vec<(WeekSlot, NaiveDate)> = match frequency {
        Some(Frequency::Daily) => slots.iter().map(|(slot, date)| (*slot, *date)).collect(),
        Some(Frequency::TwoDay) => WeekSlot::TWO_DAY
            .into_iter()
            .filter_map(|slot| slots.get(&slot).map(|date| (slot, *date)))
            .collect(),
        _ => template
            .category
            .as_deref()
            .and_then(WeekSlot::from_category)
            .and_then(|slot| slots.get(&slot).map(|date| (slot, *date)))
            .into_iter()
            .collect(),
    };

    let mut created = 0;
    let mut skipped = 0;
    let mut digest: Option<Option<String>> = None;

    for (slot, date) in candidates {
        if !is_due(frequency, template.last_completed, Reference::Planned(date)) {
            continue;
        }
        if has_open_instance(store, config, template, markers, slot, date).await? {
            tracing::debug!(
                template_id = %template.id,
                category = slot.category(),
                planned_date = %date,
                "open instance already exists, skipping"
            );
            skipped += 1;
            continue;
        }

        let mut properties = adapter::build_instance_properties(template, active_schema, anchor);
        properties.insert(
            props::CATEGORY.to_string(),
            build_value(&PropertyKind::Select, Some(slot.category())),
        );
        properties.insert(
            props::PLANNED_DATE.to_string(),
            build_value(&PropertyKind::Date, Some(&date.to_string())),
        );
        let instance = store.create_record(&config.active_db, properties).await?;
        created += 1;
        tracing::info!(
            template_id = %template.id,
            task = template.display_name(),
            category = slot.category(),
            planned_date = %date,
            "created task instance"
        );

        if digest.is_none() {
            digest = Some(summarize_history(store, summarizer, template).await);
        }
        if let Some(Some(text)) = &digest {
            if let Err(error) = store.create_comment(&instance.id, text).await {
                tracing::warn!(instance_id = %instance.id, %error, "could not attach summary comment");
            }
        }
    }

    Ok((created, skipped))
}

/// Whether an uncompleted instance already exists for this exact slot.
async fn has_open_instance<S: DocumentStore>(
    store: &S,
    config: &RolloverConfig,
    template: &TemplateTask,
    markers: &CompletionMarkers,
    slot: WeekSlot,
    date: NaiveDate,
) -> Result<bool, EngineError> {
    let filter = Filter::new()
        .rich_text_equals(props::TEMPLATE_ID, &template.id)
        .select_equals(props::CATEGORY, slot.category())
        .date_equals(props::PLANNED_DATE, date);
    let records = store.query_all(&config.active_db, Some(&filter)).await?;
    Ok(records
        .iter()
        .map(|record| adapter::active_from_record(record, &Schema::new()))
        .any(|task| !markers.is_complete(&task)))
}

/// Digest the template's accumulated completion notes, if any.
async fn summarize_history<S, Z>(store: &S, summarizer: &Z, template: &TemplateTask) -> Option<String>
where
    S: DocumentStore,
    Z: NoteSummarizer,
{
    let comments = match store.list_comments(&template.id).await {
        Ok(comments) => comments,
        Err(error) => {
            tracing::warn!(template_id = %template.id, %error, "could not list template comments");
            return None;
        }
    };
    let notes = comments
        .iter()
        .map(|comment| comment.text.as_str())
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if notes.is_empty() {
        return None;
    }
    summarizer
        .summarize(&notes, template.name.as_deref())
        .await
        .map(|summary| format!("Summary of previous completions:\n{summary}"))
}
