//! 程序入口：初始化日志、加载 Slint UI、恢复持久化状态并绑定回调

use std::{cell::RefCell, rc::Rc};

use slint::{ComponentHandle, ModelRc, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

slint::include_modules!();

mod model;
mod utils;
mod vm;

use model::beautify::BeautifyState;
use model::compare::CompareState;
use model::tree::{TreeNode, TreeState};
use utils::storage::Storage;
use vm::bridge::*;

// TreeNodeData转换实现
impl From<&TreeNode> for TreeNodeData {
    /// 将Rust TreeNode转换为Slint可用的数据结构
    fn from(node: &TreeNode) -> Self {
        Self {
            id: node.id as i32,
            name: node.name.clone().into(),
            preview: node.preview.clone().into(),
            children: node.children as i32,
            depth: node.depth as i32,
            expanded: node.expanded,
            can_toggle: node.can_toggle(),
        }
    }
}

/// VM桥接器：管理UI与三个面板状态的交互
struct ViewModelBridge {
    storage: Rc<RefCell<Storage>>,
    beautify: Rc<RefCell<BeautifyState>>,
    /// 美化输出的折叠视图：与树视图共用同一套 arena 折叠状态
    beautify_view: Rc<RefCell<TreeState>>,
    tree: Rc<RefCell<TreeState>>,
    compare: Rc<RefCell<CompareState>>,
}

impl ViewModelBridge {
    /// 创建桥接器，恢复持久化状态并绑定所有回调
    fn new(app_window: &AppWindow, storage: Storage) -> Self {
        let bridge = Self {
            storage: Rc::new(RefCell::new(storage)),
            beautify: Rc::new(RefCell::new(BeautifyState::default())),
            beautify_view: Rc::new(RefCell::new(TreeState::default())),
            tree: Rc::new(RefCell::new(TreeState::default())),
            compare: Rc::new(RefCell::new(CompareState::default())),
        };

        bridge.restore_from_storage(app_window);
        bridge.setup_callbacks(app_window);
        app_window.set_status_message(STATUS_READY.into());
        bridge
    }

    /// 启动时从存储恢复各面板的输入/输出与标志
    fn restore_from_storage(&self, app_window: &AppWindow) {
        let store = self.storage.borrow();

        // 美化面板
        {
            let mut st = self.beautify.borrow_mut();
            st.input = store.get(KEY_BEAUTIFY_INPUT).unwrap_or_default().to_string();
            st.output = store.get(KEY_BEAUTIFY_OUTPUT).unwrap_or_default().to_string();
            st.minified = store.get_bool(KEY_BEAUTIFY_MINIFIED);
            app_window.set_beautify_input(st.input.clone().into());
            app_window.set_beautify_output(st.output.clone().into());
            app_window.set_beautify_minified(st.minified);
            app_window.set_beautify_input_gutter(Self::line_gutter(&st.input));
            Self::rebuild_beautify_view(app_window, &self.beautify_view, &st.output);
        }

        // 树视图面板：输入与全局展开标志直接恢复；
        // 上一次成功解析的值以序列化形式持久化，重新解析后重建树
        {
            let mut st = self.tree.borrow_mut();
            st.input = store.get(KEY_TREE_INPUT).unwrap_or_default().to_string();
            st.expand_all = store.get_bool(KEY_TREE_EXPANDED);
            if let Some(saved) = store.get(KEY_TREE_PARSED) {
                match serde_json::from_str(saved) {
                    Ok(v) => {
                        st.nodes = model::tree::build_tree(&v, st.expand_all);
                        st.dom = Some(v);
                        st.update_visibility();
                    }
                    Err(e) => tracing::warn!("持久化的树数据损坏，忽略: {}", e),
                }
            }
            app_window.set_tree_input(st.input.clone().into());
            app_window.set_tree_expand_all(st.expand_all);
        }
        Self::refresh_tree_model(app_window, &self.tree.borrow());

        // 对比面板
        {
            let mut st = self.compare.borrow_mut();
            st.left = store.get(KEY_COMPARE_LEFT).unwrap_or_default().to_string();
            st.right = store.get(KEY_COMPARE_RIGHT).unwrap_or_default().to_string();
            st.recompute();
            app_window.set_compare_left(st.left.clone().into());
            app_window.set_compare_right(st.right.clone().into());
        }
        Self::refresh_diff_models(app_window, &self.compare.borrow());
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        // === 美化面板：输入编辑 ===
        {
            let beautify = self.beautify.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_beautify_input_edited(move |text| {
                beautify.borrow_mut().input = text.to_string();
                Self::persist(&storage, KEY_BEAUTIFY_INPUT, &text);
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_beautify_input_gutter(Self::line_gutter(&text));
                }
            });
        }

        // === 美化面板：格式化（按钮与 Ctrl+B 共用） ===
        {
            let beautify = self.beautify.clone();
            let view = self.beautify_view.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_format_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_format(&app_window, &beautify, &view, &storage);
                }
            });
        }

        // === 美化面板：压缩/展开切换 ===
        {
            let beautify = self.beautify.clone();
            let view = self.beautify_view.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_minify_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_toggle_minify(&app_window, &beautify, &view, &storage);
                }
            });
        }

        // === 美化面板：输出节点折叠开关 ===
        {
            let view = self.beautify_view.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_beautify_node_toggled(move |id| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let mut st = view.borrow_mut();
                    st.toggle(id as usize);
                    Self::refresh_beautify_view_model(&app_window, &st);
                }
            });
        }

        // === 美化面板：复制到剪贴板 ===
        {
            let beautify = self.beautify.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_copy(&app_window, &beautify);
                }
            });
        }

        // === 美化面板：导出 beautified.json ===
        {
            let beautify = self.beautify.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_export_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_export(&app_window, &beautify);
                }
            });
        }

        // === 树视图：输入编辑 ===
        {
            let tree = self.tree.clone();
            let storage = self.storage.clone();
            app_window.on_tree_input_edited(move |text| {
                tree.borrow_mut().input = text.to_string();
                Self::persist(&storage, KEY_TREE_INPUT, &text);
            });
        }

        // === 树视图：解析 ===
        {
            let tree = self.tree.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_parse_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_parse(&app_window, &tree, &storage);
                }
            });
        }

        // === 树视图：全部展开 / 全部折叠（按钮与 Ctrl+E / Ctrl+C 共用） ===
        {
            let tree = self.tree.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_expand_all_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_set_all_expanded(&app_window, &tree, &storage, true);
                }
            });
        }
        {
            let tree = self.tree.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_collapse_all_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_set_all_expanded(&app_window, &tree, &storage, false);
                }
            });
        }

        // === 树视图：单节点折叠开关 ===
        {
            let tree = self.tree.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_node_toggled(move |id| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let mut st = tree.borrow_mut();
                    st.toggle(id as usize);
                    Self::refresh_tree_model(&app_window, &st);
                }
            });
        }

        // === 对比面板：两侧输入编辑 ===
        {
            let compare = self.compare.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_compare_left_edited(move |text| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let mut st = compare.borrow_mut();
                    st.set_left(text.to_string());
                    Self::persist(&storage, KEY_COMPARE_LEFT, &text);
                    Self::refresh_diff_models(&app_window, &st);
                }
            });
        }
        {
            let compare = self.compare.clone();
            let storage = self.storage.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_compare_right_edited(move |text| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let mut st = compare.borrow_mut();
                    st.set_right(text.to_string());
                    Self::persist(&storage, KEY_COMPARE_RIGHT, &text);
                    Self::refresh_diff_models(&app_window, &st);
                }
            });
        }
    }

    /// 写入存储；失败只记日志，不打断交互
    fn persist(storage: &Rc<RefCell<Storage>>, key: &str, value: &str) {
        if let Err(e) = storage.borrow_mut().set(key, value) {
            tracing::warn!("持久化失败 {}: {}", key, e);
        }
    }

    fn persist_bool(storage: &Rc<RefCell<Storage>>, key: &str, value: bool) {
        if let Err(e) = storage.borrow_mut().set_bool(key, value) {
            tracing::warn!("持久化失败 {}: {}", key, e);
        }
    }

    /// 处理格式化操作
    fn handle_format(
        app_window: &AppWindow,
        beautify: &Rc<RefCell<BeautifyState>>,
        view: &Rc<RefCell<TreeState>>,
        storage: &Rc<RefCell<Storage>>,
    ) {
        let mut st = beautify.borrow_mut();
        st.format();
        app_window.set_beautify_output(st.output.clone().into());
        Self::rebuild_beautify_view(app_window, view, &st.output);
        Self::persist(storage, KEY_BEAUTIFY_OUTPUT, &st.output);
        app_window.set_status_message(STATUS_FORMATTED.into());
        tracing::info!("格式化完成，输出 {} 字符", st.output.len());
    }

    /// 处理压缩/展开切换
    fn handle_toggle_minify(
        app_window: &AppWindow,
        beautify: &Rc<RefCell<BeautifyState>>,
        view: &Rc<RefCell<TreeState>>,
        storage: &Rc<RefCell<Storage>>,
    ) {
        let mut st = beautify.borrow_mut();
        let minified = st.toggle_minify();
        app_window.set_beautify_output(st.output.clone().into());
        app_window.set_beautify_minified(minified);
        Self::rebuild_beautify_view(app_window, view, &st.output);
        Self::persist(storage, KEY_BEAUTIFY_OUTPUT, &st.output);
        Self::persist_bool(storage, KEY_BEAUTIFY_MINIFIED, minified);
        let mode = if minified { "压缩" } else { "格式化" };
        app_window.set_status_message(format!("已切换为{}形态", mode).into());
        tracing::info!("压缩切换: minified={}", minified);
    }

    /// 处理复制按钮操作
    fn handle_copy(app_window: &AppWindow, beautify: &Rc<RefCell<BeautifyState>>) {
        let text = beautify.borrow().output.clone();
        if text.trim().is_empty() {
            app_window.set_status_message(format!("{}没有可复制的内容", STATUS_ERROR_PREFIX).into());
            return;
        }
        match utils::clipboard::copy_text(&text) {
            Ok(()) => {
                app_window.set_status_message(STATUS_COPIED.into());
                tracing::info!("内容已复制到剪贴板，长度: {} 字符", text.len());
            }
            Err(e) => {
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                tracing::error!("复制失败: {}", e);
            }
        }
    }

    /// 处理导出操作：弹出保存对话框，默认文件名 beautified.json
    fn handle_export(app_window: &AppWindow, beautify: &Rc<RefCell<BeautifyState>>) {
        let text = beautify.borrow().output.clone();
        if text.trim().is_empty() {
            app_window.set_status_message(format!("{}没有可导出的内容", STATUS_ERROR_PREFIX).into());
            return;
        }

        let picked = rfd::FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .set_file_name(utils::fs::EXPORT_FILE_NAME)
            .set_title("导出格式化结果")
            .save_file();

        let Some(path) = picked else {
            tracing::info!("用户取消了导出");
            return;
        };

        match utils::fs::export_text(&path, &text) {
            Ok(()) => {
                app_window
                    .set_status_message(format!("{}: {}", STATUS_EXPORTED, path.display()).into());
                tracing::info!("已导出 {} 字符到 {}", text.len(), path.display());
            }
            Err(e) => {
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                tracing::error!("导出失败: {}", e);
            }
        }
    }

    /// 处理树视图解析操作
    fn handle_parse(
        app_window: &AppWindow,
        tree: &Rc<RefCell<TreeState>>,
        storage: &Rc<RefCell<Storage>>,
    ) {
        let mut st = tree.borrow_mut();
        st.parse();

        // 最近一次成功解析的值以序列化形式持久化；失败时移除旧值
        match &st.dom {
            Some(dom) => match serde_json::to_string(dom) {
                Ok(s) => Self::persist(storage, KEY_TREE_PARSED, &s),
                Err(e) => tracing::warn!("树数据序列化失败: {}", e),
            },
            None => {
                if let Err(e) = storage.borrow_mut().remove(KEY_TREE_PARSED) {
                    tracing::warn!("持久化失败 {}: {}", KEY_TREE_PARSED, e);
                }
            }
        }

        Self::refresh_tree_model(app_window, &st);
        if st.dom.is_some() {
            app_window
                .set_status_message(format!("{}，共 {} 个节点", STATUS_PARSED, st.nodes.len()).into());
            tracing::info!("树解析成功: {} 个节点", st.nodes.len());
        } else {
            app_window.set_status_message(format!("{}输入不是合法JSON", STATUS_ERROR_PREFIX).into());
        }
    }

    /// 处理全部展开/折叠：全局开关是权威状态，显式重置所有节点标志
    fn handle_set_all_expanded(
        app_window: &AppWindow,
        tree: &Rc<RefCell<TreeState>>,
        storage: &Rc<RefCell<Storage>>,
        expanded: bool,
    ) {
        let mut st = tree.borrow_mut();
        st.set_all_expanded(expanded);
        app_window.set_tree_expand_all(expanded);
        Self::persist_bool(storage, KEY_TREE_EXPANDED, expanded);
        Self::refresh_tree_model(app_window, &st);
        let action = if expanded { "全部展开" } else { "全部折叠" };
        app_window.set_status_message(action.into());
        tracing::info!("{}", action);
    }

    /// 用可见节点重建树模型
    fn refresh_tree_model(app_window: &AppWindow, st: &TreeState) {
        let rows: Vec<TreeNodeData> = st.visible_nodes().map(TreeNodeData::from).collect();
        app_window.set_tree_has_content(!rows.is_empty());
        app_window.set_tree_model(ModelRc::new(VecModel::from(rows)));
    }

    /// 用输出文本重建美化面板的折叠视图：输出是合法 JSON 时构建全展开的
    /// 树，哨兵文本或空输出则清空视图（此时界面回退为纯文本展示）
    fn rebuild_beautify_view(
        app_window: &AppWindow,
        view: &Rc<RefCell<TreeState>>,
        output: &str,
    ) {
        let mut st = view.borrow_mut();
        st.input = output.to_string();
        st.expand_all = true;
        if output.is_empty() {
            st.dom = None;
            st.nodes.clear();
        } else {
            st.parse();
        }
        app_window.set_beautify_output_gutter(Self::line_gutter(output));
        Self::refresh_beautify_view_model(app_window, &st);
    }

    /// 用可见节点重建美化输出的折叠视图模型
    fn refresh_beautify_view_model(app_window: &AppWindow, st: &TreeState) {
        let rows: Vec<TreeNodeData> = st.visible_nodes().map(TreeNodeData::from).collect();
        app_window.set_beautify_view_has_content(!rows.is_empty());
        app_window.set_beautify_tree_model(ModelRc::new(VecModel::from(rows)));
    }

    /// 行号侧栏模型：1..=行数，行数至少为 1
    fn line_gutter(text: &str) -> ModelRc<slint::SharedString> {
        let rows: Vec<slint::SharedString> = (1..=model::beautify::line_count(text))
            .map(|n| n.to_string().into())
            .collect();
        ModelRc::new(VecModel::from(rows))
    }

    /// 用当前差异映射重建两侧的行模型（两侧共用同一份行号分类）
    fn refresh_diff_models(app_window: &AppWindow, st: &CompareState) {
        app_window.set_left_lines(Self::diff_rows(&st.left, st));
        app_window.set_right_lines(Self::diff_rows(&st.right, st));
    }

    fn diff_rows(text: &str, st: &CompareState) -> ModelRc<DiffLineData> {
        let rows: Vec<DiffLineData> = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| DiffLineData {
                number: (i + 1).to_string().into(),
                text: line.into(),
                marker: st.diff.get(&i).map(|d| d.as_str()).unwrap_or("").into(),
            })
            .collect();
        ModelRc::new(VecModel::from(rows))
    }
}

fn main() {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let app = AppWindow::new().expect("UI 初始化失败");

    let state_path = utils::fs::default_state_path();
    tracing::info!("状态文件: {}", state_path.display());
    let _bridge = ViewModelBridge::new(&app, Storage::open(state_path));

    tracing::info!("应用启动成功，UI已初始化");
    app.run().expect("事件循环异常退出");
}
