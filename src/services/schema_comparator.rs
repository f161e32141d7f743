// スキーマ比較サービス
//
// 1つのオブジェクトカテゴリについて、ソースとターゲットのカタログを比較し、
// オブジェクトごとの比較結果レコード（DDL付き）を生成します。
// - キー集合の分割（ソースのみ・ターゲットのみ・共通）
// - 共通オブジェクトの同一性判定と差分計算
// - DDL生成コラボレーターの呼び出し

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::core::comparison::{ComparisonRecord, ComparisonStatus, Dependency, IdSequence};
use crate::core::config::ComparePreferences;
use crate::core::difference::DifferenceDict;
use crate::core::error::CollaboratorError;
use crate::core::metadata::{object_oid, ObjectCatalog, ObjectMetadata};
use crate::core::profiles::{CategoryProfile, OWNER_KEYS, TABLE_CATEGORY, TABLE_SUBMODULES};
use crate::services::acl_differ::AclDiffer;
use crate::services::dictionary_comparator::DictionaryComparator;
use crate::services::directory_differ::DirectoryDiffer;
use crate::services::key_partitioner::KeyPartition;
use crate::services::table_differ::TableDiffer;
use crate::services::traits::{DdlProvider, DiffSqlParams, ObjectRef, Side, SubmoduleDiffParams};

/// 比較リクエスト
///
/// 1カテゴリ分の入力をまとめたものです。カタログは変更されません。
#[derive(Debug, Clone, Copy)]
pub struct CompareRequest<'a> {
    /// ソース側のカタログ
    pub source: &'a ObjectCatalog,
    /// ターゲット側のカタログ
    pub target: &'a ObjectCatalog,
    /// オブジェクトカテゴリ
    pub category: &'a str,
    /// カテゴリの表示ラベル
    pub node_label: &'a str,
    /// 表示用グループ名
    pub group_name: &'a str,
    /// ソースのみのオブジェクトのDDLを書き換えるスキーマ名
    pub target_schema: Option<&'a str>,
    /// 比較から除外するキー
    pub ignore_keys: &'a [String],
    /// ソース側のスキーマID
    pub source_scid: Option<i64>,
    /// ターゲット側のスキーマID
    pub target_scid: Option<i64>,
}

impl<'a> CompareRequest<'a> {
    /// カテゴリプロファイルからリクエストを作成
    pub fn from_profile(
        source: &'a ObjectCatalog,
        target: &'a ObjectCatalog,
        profile: &'a CategoryProfile,
    ) -> Self {
        Self {
            source,
            target,
            category: &profile.category,
            node_label: &profile.label,
            group_name: &profile.group_name,
            target_schema: None,
            ignore_keys: &profile.ignore_keys,
            source_scid: None,
            target_scid: None,
        }
    }

    /// 書き換え先スキーマを設定
    pub fn with_target_schema(mut self, target_schema: Option<&'a str>) -> Self {
        self.target_schema = target_schema;
        self
    }

    /// スキーマIDを設定
    pub fn with_scids(mut self, source_scid: Option<i64>, target_scid: Option<i64>) -> Self {
        self.source_scid = source_scid;
        self.target_scid = target_scid;
        self
    }

    fn is_table(&self) -> bool {
        self.category == TABLE_CATEGORY
    }
}

/// スキーマ比較サービス
#[derive(Debug, Clone)]
pub struct SchemaComparator<P> {
    provider: P,
    preferences: ComparePreferences,
    comparator: DictionaryComparator,
    differ: DirectoryDiffer,
    acl_differ: AclDiffer,
    table_differ: TableDiffer,
}

impl<P: DdlProvider> SchemaComparator<P> {
    /// 新しいSchemaComparatorを作成
    pub fn new(provider: P, preferences: ComparePreferences) -> Self {
        Self {
            provider,
            preferences,
            comparator: DictionaryComparator::with_ignore_whitespaces(
                preferences.ignore_whitespaces,
            ),
            differ: DirectoryDiffer::new(),
            acl_differ: AclDiffer::new(),
            table_differ: TableDiffer::new(),
        }
    }

    pub fn preferences(&self) -> ComparePreferences {
        self.preferences
    }

    /// 設定を反映した無視キーを取得
    ///
    /// 所有者を無視する設定の場合は所有者キーを追加します。
    pub fn effective_ignore_keys(&self, ignore_keys: &[String]) -> HashSet<String> {
        let mut keys: HashSet<String> = ignore_keys.iter().cloned().collect();
        if self.preferences.ignore_owner {
            keys.extend(OWNER_KEYS.iter().map(|k| k.to_string()));
        }
        keys
    }

    /// 2つのカタログを比較
    ///
    /// # Arguments
    ///
    /// * `request` - 比較対象のカタログとカテゴリ情報
    /// * `ids` - レコードIDの連番（比較実行ごとに呼び出し側が作成）
    ///
    /// # Returns
    ///
    /// ソースのみ、ターゲットのみ、差分あり、同一の順に並んだ比較結果
    pub fn compare_dictionaries(
        &self,
        request: &CompareRequest<'_>,
        ids: &mut IdSequence,
    ) -> Result<Vec<ComparisonRecord>, CollaboratorError> {
        let mut source = request.source.clone();
        let mut target = request.target.clone();

        if request.is_table() {
            for metadata in source.values_mut().chain(target.values_mut()) {
                self.table_differ.strip_volatile_keys(metadata);
            }
        }

        let ignore_keys = self.effective_ignore_keys(request.ignore_keys);
        let partition = KeyPartition::of(&source, &target);

        debug!(
            category = request.category,
            total = partition.total(),
            added = partition.added.len(),
            removed = partition.removed.len(),
            intersect = partition.intersect.len(),
            "Partitioned catalog keys"
        );

        let mut source_only = Vec::with_capacity(partition.added.len());
        for name in &partition.added {
            let record = self.source_only_record(request, name, ids)?;
            source_only.push(record);
        }

        let mut target_only = Vec::with_capacity(partition.removed.len());
        for name in &partition.removed {
            let record = self.target_only_record(request, name, ids)?;
            target_only.push(record);
        }

        let mut identical = Vec::new();
        let mut different = Vec::new();
        for name in &partition.intersect {
            let (Some(source_copy), Some(target_copy)) = (source.get_mut(name), target.get_mut(name))
            else {
                continue;
            };

            for key in &ignore_keys {
                source_copy.remove(key);
                target_copy.remove(key);
            }

            if self
                .comparator
                .are_dictionaries_identical(source_copy, target_copy, &ignore_keys)
            {
                debug!(category = request.category, object = %name, "Objects are identical");
                identical.push(self.identical_record(request, name, ids));
            } else {
                debug!(category = request.category, object = %name, "Objects are different");
                let difference =
                    self.difference_for(request.category, source_copy, target_copy, &ignore_keys);
                different.push(self.different_record(request, name, &difference, ids)?);
            }
        }

        info!(
            category = request.category,
            source_only = source_only.len(),
            target_only = target_only.len(),
            different = different.len(),
            identical = identical.len(),
            "Compared catalogs"
        );

        let mut records = source_only;
        records.extend(target_only);
        records.extend(different);
        records.extend(identical);
        Ok(records)
    }

    /// 単一オブジェクトの差分を計算
    ///
    /// `compare_dictionaries` と同じ前処理（揮発キーと無視キーの除去）を行ってから差分を計算します。
    /// 入力のメタデータは変更しません。
    pub fn object_difference(
        &self,
        category: &str,
        source: &ObjectMetadata,
        target: &ObjectMetadata,
        ignore_keys: &[String],
    ) -> DifferenceDict {
        let ignore_keys = self.effective_ignore_keys(ignore_keys);
        let mut source = source.clone();
        let mut target = target.clone();

        for metadata in [&mut source, &mut target] {
            if category == TABLE_CATEGORY {
                self.table_differ.strip_volatile_keys(metadata);
            }
            for key in &ignore_keys {
                metadata.remove(key);
            }
        }

        self.difference_for(category, &source, &target, &ignore_keys)
    }

    /// 2つのオブジェクトの差分辞書を計算
    ///
    /// テーブルの場合はサブモジュールを除外し、カラム・制約の差分を別途計算して統合します。
    /// 最後にACLの差分を反映します。
    pub fn difference_for(
        &self,
        category: &str,
        source: &ObjectMetadata,
        target: &ObjectMetadata,
        ignore_keys: &HashSet<String>,
    ) -> DifferenceDict {
        let mut difference = if category == TABLE_CATEGORY {
            let mut table_ignore = ignore_keys.clone();
            table_ignore.extend(TABLE_SUBMODULES.iter().map(|k| k.to_string()));
            table_ignore.extend(TableDiffer::handled_keys().into_iter().map(String::from));

            let mut difference = self.differ.directory_diff(source, target, &table_ignore);
            difference.merge(self.table_differ.table_diff(source, target));
            difference
        } else {
            self.differ.directory_diff(source, target, ignore_keys)
        };

        self.acl_differ.parse_acl(source, target, &mut difference);
        difference
    }

    fn source_only_record(
        &self,
        request: &CompareRequest<'_>,
        name: &str,
        ids: &mut IdSequence,
    ) -> Result<ComparisonRecord, CollaboratorError> {
        let metadata = &request.source[name];
        let object = self.object_ref(request, name, Side::Source, metadata);

        let (source_ddl, diff_ddl, dependencies) = if request.is_table() {
            let source_ddl = self.provider.sql_from_table_diff(&DiffSqlParams::own(object))?;
            let diff_ddl = self.provider.sql_from_table_diff(
                &DiffSqlParams::with_target_schema(object, request.target_schema),
            )?;
            let dependencies = self.provider.table_submodules_dependencies(&object)?;
            (source_ddl, diff_ddl, dependencies)
        } else {
            let source_ddl = self.provider.sql_from_diff(&DiffSqlParams::own(object))?;
            let diff_ddl = self.provider.sql_from_diff(&DiffSqlParams::with_target_schema(
                object,
                request.target_schema,
            ))?;
            let dependencies = self.provider.dependencies(&object)?;
            (source_ddl, diff_ddl, dependencies)
        };

        Ok(ComparisonRecord {
            id: ids.next_id(),
            oid: object.oid,
            source_ddl,
            target_ddl: String::new(),
            diff_ddl,
            dependencies,
            ..self.base_record(request, name, ComparisonStatus::SourceOnly)
        })
    }

    fn target_only_record(
        &self,
        request: &CompareRequest<'_>,
        name: &str,
        ids: &mut IdSequence,
    ) -> Result<ComparisonRecord, CollaboratorError> {
        let metadata = &request.target[name];
        let object = self.object_ref(request, name, Side::Target, metadata);

        let target_ddl = if request.is_table() {
            self.provider.sql_from_table_diff(&DiffSqlParams::own(object))?
        } else {
            self.provider.sql_from_diff(&DiffSqlParams::own(object))?
        };
        let diff_ddl = self.provider.drop_sql(&object)?;

        Ok(ComparisonRecord {
            id: ids.next_id(),
            oid: object.oid,
            source_ddl: String::new(),
            target_ddl,
            diff_ddl,
            ..self.base_record(request, name, ComparisonStatus::TargetOnly)
        })
    }

    fn identical_record(
        &self,
        request: &CompareRequest<'_>,
        name: &str,
        ids: &mut IdSequence,
    ) -> ComparisonRecord {
        let source_oid = self.oid_of(request, &request.source[name], name);
        let target_oid = self.oid_of(request, &request.target[name], name);

        ComparisonRecord {
            id: ids.next_id(),
            oid: source_oid,
            source_oid,
            target_oid,
            ..self.base_record(request, name, ComparisonStatus::Identical)
        }
    }

    fn different_record(
        &self,
        request: &CompareRequest<'_>,
        name: &str,
        difference: &DifferenceDict,
        ids: &mut IdSequence,
    ) -> Result<ComparisonRecord, CollaboratorError> {
        let source = self.object_ref(request, name, Side::Source, &request.source[name]);
        let target = self.object_ref(request, name, Side::Target, &request.target[name]);

        let (source_ddl, target_ddl, diff_ddl, dependencies) = if request.is_table() {
            let source_ddl = self.provider.sql_from_table_diff(&DiffSqlParams::own(source))?;
            let dependencies = self.provider.table_submodules_dependencies(&source)?;
            let target_ddl = self.provider.sql_from_table_diff(&DiffSqlParams::own(target))?;
            let diff_ddl = self.provider.sql_from_submodule_diff(&SubmoduleDiffParams {
                source,
                target,
                diff_data: difference,
                target_schema: request.target_schema,
                ignore_whitespaces: self.preferences.ignore_whitespaces,
            })?;
            (source_ddl, target_ddl, diff_ddl, dependencies)
        } else {
            let source_ddl = self.provider.sql_from_diff(&DiffSqlParams::own(source))?;
            let dependencies = self.provider.dependencies(&source)?;
            let target_ddl = self.provider.sql_from_diff(&DiffSqlParams::own(target))?;
            let diff_ddl = self.provider.sql_from_diff(&DiffSqlParams::with_diff(
                target,
                difference,
                request.target_schema,
            ))?;
            (source_ddl, target_ddl, diff_ddl, dependencies)
        };

        Ok(ComparisonRecord {
            id: ids.next_id(),
            oid: source.oid,
            source_ddl,
            target_ddl,
            diff_ddl,
            dependencies,
            source_oid: source.oid,
            target_oid: target.oid,
            ..self.base_record(request, name, ComparisonStatus::Different)
        })
    }

    fn object_ref<'a>(
        &self,
        request: &CompareRequest<'a>,
        name: &'a str,
        side: Side,
        metadata: &'a ObjectMetadata,
    ) -> ObjectRef<'a> {
        let scid = match side {
            Side::Source => request.source_scid,
            Side::Target => request.target_scid,
        };
        ObjectRef {
            category: request.category,
            name,
            side,
            oid: self.oid_of(request, metadata, name),
            scid,
            metadata,
        }
    }

    fn oid_of(
        &self,
        request: &CompareRequest<'_>,
        metadata: &ObjectMetadata,
        name: &str,
    ) -> Option<i64> {
        let oid = object_oid(metadata);
        if oid.is_none() {
            warn!(category = request.category, object = %name, "Object metadata has no oid");
        }
        oid
    }

    /// 共通フィールドを埋めたレコード（IDは呼び出し側で設定）
    fn base_record(
        &self,
        request: &CompareRequest<'_>,
        name: &str,
        status: ComparisonStatus,
    ) -> ComparisonRecord {
        ComparisonRecord {
            id: 0,
            category: request.category.to_string(),
            label: request.node_label.to_string(),
            title: name.to_string(),
            oid: None,
            status,
            source_ddl: String::new(),
            target_ddl: String::new(),
            diff_ddl: String::new(),
            group_name: request.group_name.to_string(),
            dependencies: Vec::<Dependency>::new(),
            source_oid: None,
            target_oid: None,
            source_scid: request.source_scid,
            target_scid: request.target_scid,
        }
    }
}
